//! `uninstall`: remove the installed binary from the system bin directory.

use std::path::PathBuf;

use clap::Args;
use hotstuff::manager::{UninstallConfig, UninstallOutcome, Uninstaller, DEFAULT_BIN_DIR};

use super::load_manifest;
use crate::error::CliError;

#[derive(Debug, Args)]
pub struct UninstallArgs {
    /// Path to package.json (default: ./package.json)
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Directory the binary was installed into
    #[arg(long, default_value = DEFAULT_BIN_DIR)]
    pub bin_dir: PathBuf,
}

/// Run the uninstall command.
pub fn run(args: UninstallArgs) -> Result<UninstallOutcome, CliError> {
    let manifest = load_manifest(args.manifest.as_deref())?;
    let uninstaller = Uninstaller::new(UninstallConfig::new(args.bin_dir));

    let outcome = uninstaller.uninstall(manifest.name())?;
    match &outcome {
        UninstallOutcome::Removed(_) => {
            println!("{} successfully uninstalled.", manifest.name())
        }
        UninstallOutcome::NotInstalled(_) => {
            println!("{} not installed yet. Moving on...", manifest.name())
        }
    }

    Ok(outcome)
}
