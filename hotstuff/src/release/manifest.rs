//! Package identity read from the npm `package.json`.
//!
//! The installer ships inside an npm package; the package's own manifest is
//! the authority for its name, version and repository.

use std::fs;
use std::path::{Path, PathBuf};

use semver::Version;
use serde::Deserialize;

use super::locator::ReleaseDescriptor;
use crate::manager::{ManagerError, ManagerResult};

/// Default manifest filename, resolved against the working directory.
pub const MANIFEST_FILENAME: &str = "package.json";

#[derive(Debug, Deserialize)]
struct RawManifest {
    name: String,
    version: String,
    repository: RawRepository,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawRepository {
    Url(String),
    Object { url: String },
}

impl RawRepository {
    fn url(&self) -> &str {
        match self {
            Self::Url(url) => url,
            Self::Object { url } => url,
        }
    }
}

/// Validated package identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageManifest {
    scope: Option<String>,
    name: String,
    version: Version,
    repository_url: String,
}

impl PackageManifest {
    /// Create a manifest from already-validated parts.
    pub fn new(
        scope: Option<String>,
        name: impl Into<String>,
        version: Version,
        repository_url: impl Into<String>,
    ) -> Self {
        Self {
            scope,
            name: name.into(),
            version,
            repository_url: normalize_repository_url(&repository_url.into()),
        }
    }

    /// Load and validate a `package.json` file.
    pub fn load(path: &Path) -> ManagerResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| ManagerError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&contents, path)
    }

    /// Parse manifest JSON. `origin` is only used for error reporting.
    pub fn parse(json: &str, origin: &Path) -> ManagerResult<Self> {
        let invalid = |reason: String| ManagerError::ManifestInvalid {
            path: PathBuf::from(origin),
            reason,
        };

        let raw: RawManifest = serde_json::from_str(json).map_err(|e| invalid(e.to_string()))?;

        let (scope, name) = split_package_name(&raw.name)
            .ok_or_else(|| invalid(format!("invalid package name \"{}\"", raw.name)))?;

        let version = Version::parse(raw.version.trim())
            .map_err(|e| invalid(format!("invalid version \"{}\": {}", raw.version, e)))?;

        let repository_url = raw.repository.url().trim();
        if repository_url.is_empty() {
            return Err(invalid("repository url is empty".to_string()));
        }

        Ok(Self::new(scope, name, version, repository_url))
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// Short package name, which is also the installed binary's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn repository_url(&self) -> &str {
        &self.repository_url
    }

    /// Describe this package's release for a specific target.
    pub fn release_for(&self, target_triple: &str) -> ReleaseDescriptor {
        ReleaseDescriptor {
            package_scope: self.scope.clone(),
            package_name: self.name.clone(),
            version: self.version.clone(),
            target_triple: target_triple.to_string(),
            base_repository_url: self.repository_url.clone(),
        }
    }
}

/// Split `@scope/name` into its parts. A bare `name` has no scope.
fn split_package_name(full: &str) -> Option<(Option<String>, String)> {
    let full = full.trim();
    match full.split_once('/') {
        Some((scope, name)) => {
            let valid = scope.len() > 1
                && scope.starts_with('@')
                && !name.is_empty()
                && !name.contains('/');
            valid.then(|| (Some(scope.to_string()), name.to_string()))
        }
        None if !full.is_empty() && !full.starts_with('@') => Some((None, full.to_string())),
        None => None,
    }
}

/// Strip npm's `git+` prefix and `.git` suffix so the URL is browsable.
fn normalize_repository_url(url: &str) -> String {
    let url = url.trim();
    let url = url.strip_prefix("git+").unwrap_or(url);
    let url = url.trim_end_matches('/');
    let url = url.strip_suffix(".git").unwrap_or(url);
    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(json: &str) -> ManagerResult<PackageManifest> {
        PackageManifest::parse(json, Path::new("package.json"))
    }

    #[test]
    fn test_parse_scoped_package() {
        let manifest = parse(
            r#"{
                "name": "@ostera/hotstuff",
                "version": "0.2.1",
                "repository": { "type": "git", "url": "https://github.com/ostera/hotstuff" }
            }"#,
        )
        .unwrap();

        assert_eq!(manifest.scope(), Some("@ostera"));
        assert_eq!(manifest.name(), "hotstuff");
        assert_eq!(manifest.version(), &Version::new(0, 2, 1));
        assert_eq!(manifest.repository_url(), "https://github.com/ostera/hotstuff");
    }

    #[test]
    fn test_parse_unscoped_package_with_string_repository() {
        let manifest = parse(
            r#"{"name": "pkg", "version": "1.2.3", "repository": "https://example.com/org/pkg"}"#,
        )
        .unwrap();

        assert_eq!(manifest.scope(), None);
        assert_eq!(manifest.name(), "pkg");
    }

    #[test]
    fn test_repository_url_is_normalized() {
        let manifest = parse(
            r#"{"name": "pkg", "version": "1.2.3",
                "repository": {"url": "git+https://github.com/org/pkg.git"}}"#,
        )
        .unwrap();
        assert_eq!(manifest.repository_url(), "https://github.com/org/pkg");
    }

    #[test]
    fn test_invalid_version_is_rejected() {
        let err = parse(r#"{"name": "pkg", "version": "one", "repository": "https://x"}"#)
            .unwrap_err();
        assert!(matches!(err, ManagerError::ManifestInvalid { .. }));
        assert!(err.to_string().contains("invalid version"));
    }

    #[test]
    fn test_invalid_names_are_rejected() {
        for name in ["", "@scope", "@/pkg", "@scope/", "@a/b/c"] {
            let json = format!(
                r#"{{"name": "{}", "version": "1.0.0", "repository": "https://x"}}"#,
                name
            );
            assert!(parse(&json).is_err(), "name {:?} should be rejected", name);
        }
    }

    #[test]
    fn test_missing_repository_is_rejected() {
        let err = parse(r#"{"name": "pkg", "version": "1.0.0"}"#).unwrap_err();
        assert!(matches!(err, ManagerError::ManifestInvalid { .. }));
    }

    #[test]
    fn test_release_for_target() {
        let manifest = PackageManifest::new(
            None,
            "pkg",
            Version::new(1, 2, 3),
            "https://example.com/org/pkg",
        );
        let release = manifest.release_for("x86_64-unknown-linux-musl");

        assert_eq!(
            release.download_url(),
            "https://example.com/org/pkg/releases/download/v1.2.3/pkg-v1.2.3-x86_64-unknown-linux-musl.tar.gz"
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"name": "@org/pkg", "version": "3.0.0", "repository": "https://example.com/org/pkg"}}"#
        )
        .unwrap();

        let manifest = PackageManifest::load(file.path()).unwrap();
        assert_eq!(manifest.name(), "pkg");
    }

    #[test]
    fn test_load_missing_file() {
        let err = PackageManifest::load(Path::new("/nonexistent/package.json")).unwrap_err();
        assert!(matches!(err, ManagerError::ReadFailed { .. }));
    }
}
