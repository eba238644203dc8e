//! Release installer.
//!
//! This module runs the full installation pipeline, each stage feeding the
//! next:
//! 1. Resolve the host platform to a target triple
//! 2. Build the release download URL
//! 3. Fetch the archive (bounded redirects)
//! 4. Stream-extract the archive into the install directory

use std::path::PathBuf;

use semver::Version;
use tracing::info;

use crate::release::{HostPlatform, PackageManifest};

use super::config::InstallerConfig;
use super::error::ManagerResult;
use super::extractor::TarGzExtractor;
use super::fetch::Fetcher;
use super::http::{HttpTransport, ReqwestTransport};

/// Progress callback for installation operations.
///
/// # Arguments
///
/// * `stage` - Current installation stage
/// * `message` - Human-readable message
pub type InstallProgressCallback = Box<dyn Fn(InstallStage, &str) + Send + Sync>;

/// Installation stages for progress reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStage {
    /// Matching the host against supported platforms.
    ResolvingPlatform,
    /// Requesting the release archive.
    Downloading,
    /// Extracting archive contents.
    Extracting,
    /// Installation complete.
    Complete,
}

impl InstallStage {
    /// Get a human-readable name for the stage.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ResolvingPlatform => "Resolving platform",
            Self::Downloading => "Downloading",
            Self::Extracting => "Extracting",
            Self::Complete => "Complete",
        }
    }
}

/// Result of a release installation.
#[derive(Debug, Clone)]
pub struct InstallResult {
    /// Short name of the installed package.
    pub package_name: String,
    /// Installed version.
    pub version: Version,
    /// Target triple of the installed archive.
    pub target_triple: String,
    /// URL the archive was requested from.
    pub download_url: String,
    /// Directory the archive was extracted into.
    pub install_path: PathBuf,
    /// Number of archive entries written.
    pub files_extracted: usize,
}

/// Installs a package's prebuilt release for the current host.
pub struct ReleaseInstaller<T: HttpTransport> {
    fetcher: Fetcher<T>,
    extractor: TarGzExtractor,
    config: InstallerConfig,
}

impl ReleaseInstaller<ReqwestTransport> {
    /// Create an installer backed by a real HTTP client.
    pub fn from_config(config: InstallerConfig) -> ManagerResult<Self> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::new(transport, config))
    }
}

impl<T: HttpTransport> ReleaseInstaller<T> {
    /// Create an installer over an arbitrary transport.
    pub fn new(transport: T, config: InstallerConfig) -> Self {
        Self {
            fetcher: Fetcher::new(transport).with_redirect_hops(config.redirect_hops),
            extractor: TarGzExtractor::new(),
            config,
        }
    }

    pub fn config(&self) -> &InstallerConfig {
        &self.config
    }

    /// Install the release of `manifest` built for `host`.
    ///
    /// Unsupported platforms fail before any network activity.
    pub fn install(
        &self,
        manifest: &PackageManifest,
        host: &HostPlatform,
        on_progress: Option<InstallProgressCallback>,
    ) -> ManagerResult<InstallResult> {
        let report = |stage: InstallStage, message: &str| {
            if let Some(ref cb) = on_progress {
                cb(stage, message);
            }
        };

        // Stage 1: platform
        report(
            InstallStage::ResolvingPlatform,
            &format!("Detected {}", host),
        );
        let platform = host.resolve()?;
        let release = manifest.release_for(platform.target_triple);
        let download_url = release.download_url();
        info!(release = %release, url = %download_url, "Resolved release");

        // Stage 2: fetch
        report(
            InstallStage::Downloading,
            &format!("Downloading release from:\n  {}", download_url),
        );
        let stream = self.fetcher.fetch(&download_url)?;

        // Stage 3: extract
        let install_path = self.config.install_dir.clone();
        report(
            InstallStage::Extracting,
            &format!("Extracting into {}", install_path.display()),
        );
        let files_extracted = self.extractor.extract(stream.body, &install_path)?;
        info!(
            files = files_extracted,
            path = %install_path.display(),
            "Release extracted"
        );

        report(
            InstallStage::Complete,
            &format!("{} has been installed!", manifest.name()),
        );

        Ok(InstallResult {
            package_name: manifest.name().to_string(),
            version: manifest.version().clone(),
            target_triple: platform.target_triple.to_string(),
            download_url,
            install_path,
            files_extracted,
        })
    }
}
