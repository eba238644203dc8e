//! Download URL construction for release archives.
//!
//! This module is the single source of truth for where a release archive
//! lives. The layout follows GitHub release assets:
//!
//! `{repository}/releases/download/v{version}/{name}-v{version}-{target}.tar.gz`

use std::fmt;

use semver::Version;

/// Everything needed to locate one platform's release archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseDescriptor {
    /// npm scope of the package (e.g. "@ostera"), if any.
    pub package_scope: Option<String>,
    /// Short package name, without scope.
    pub package_name: String,
    /// Release version.
    pub version: Version,
    /// Target triple of the archive to fetch.
    pub target_triple: String,
    /// Repository URL releases are published under.
    pub base_repository_url: String,
}

impl ReleaseDescriptor {
    /// Filename of the release archive.
    pub fn archive_filename(&self) -> String {
        archive_filename(&self.package_name, &self.version, &self.target_triple)
    }

    /// Full download URL of the release archive.
    pub fn download_url(&self) -> String {
        format!(
            "{}/releases/download/v{}/{}",
            self.base_repository_url.trim_end_matches('/'),
            self.version,
            self.archive_filename()
        )
    }
}

impl fmt::Display for ReleaseDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.package_scope {
            Some(scope) => write!(f, "{}/{}", scope, self.package_name)?,
            None => write!(f, "{}", self.package_name)?,
        }
        write!(f, " v{} ({})", self.version, self.target_triple)
    }
}

/// Generate the archive filename for a package release.
///
/// # Format
///
/// `{package_name}-v{version}-{target_triple}.tar.gz`
///
/// # Examples
///
/// ```
/// use semver::Version;
/// use hotstuff::release::archive_filename;
///
/// assert_eq!(
///     archive_filename("pkg", &Version::new(1, 2, 3), "x86_64-apple-darwin"),
///     "pkg-v1.2.3-x86_64-apple-darwin.tar.gz"
/// );
/// ```
pub fn archive_filename(package_name: &str, version: &Version, target_triple: &str) -> String {
    format!("{}-v{}-{}.tar.gz", package_name, version, target_triple)
}
