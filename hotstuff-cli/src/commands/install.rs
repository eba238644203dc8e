//! `install`: download and unpack the release for this machine.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use hotstuff::manager::{InstallStage, InstallerConfig, ReleaseInstaller, DEFAULT_TIMEOUT};
use hotstuff::release::HostPlatform;
use tracing::{debug, info};

use super::load_manifest;
use crate::error::CliError;

#[derive(Debug, Args)]
pub struct InstallArgs {
    /// Path to package.json (default: ./package.json)
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Directory to extract the release into
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,

    /// HTTP timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout: u64,
}

impl InstallArgs {
    fn config(&self) -> Result<InstallerConfig, CliError> {
        if self.timeout == 0 {
            return Err(CliError::Config(
                "--timeout must be at least 1 second".to_string(),
            ));
        }
        Ok(InstallerConfig::new(self.dir.clone()).with_timeout(Duration::from_secs(self.timeout)))
    }
}

/// Run the install command.
pub fn run(args: InstallArgs) -> Result<(), CliError> {
    let manifest = load_manifest(args.manifest.as_deref())?;
    let config = args.config()?;
    debug!(
        dir = %config.install_dir.display(),
        timeout_secs = config.timeout.as_secs(),
        "Installer configured"
    );
    let installer = ReleaseInstaller::from_config(config)?;

    let result = installer.install(
        &manifest,
        &HostPlatform::detect(),
        Some(Box::new(|stage: InstallStage, message: &str| match stage {
            InstallStage::ResolvingPlatform => {}
            _ => println!("{}", message),
        })),
    )?;

    info!(
        package = %result.package_name,
        version = %result.version,
        target = %result.target_triple,
        files = result.files_extracted,
        "Install finished"
    );
    Ok(())
}
