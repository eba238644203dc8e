//! Removal of the installed binary from the system bin directory.

use std::fs;
use std::io;
use std::path::PathBuf;

use tracing::{debug, info};

use super::config::UninstallConfig;
use super::error::{ManagerError, ManagerResult};

/// What the uninstaller found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UninstallOutcome {
    /// The binary existed and was removed.
    Removed(PathBuf),
    /// Nothing was installed at the expected location.
    NotInstalled(PathBuf),
}

/// Removes a package binary from the configured bin directory.
#[derive(Debug, Clone, Default)]
pub struct Uninstaller {
    config: UninstallConfig,
}

impl Uninstaller {
    pub fn new(config: UninstallConfig) -> Self {
        Self { config }
    }

    /// Path the binary for `package_name` is expected at.
    pub fn binary_path(&self, package_name: &str) -> PathBuf {
        self.config.bin_dir.join(package_name)
    }

    /// Remove the binary for `package_name` if it exists.
    ///
    /// A missing binary is not an error.
    pub fn uninstall(&self, package_name: &str) -> ManagerResult<UninstallOutcome> {
        let path = self.binary_path(package_name);

        match fs::remove_file(&path) {
            Ok(()) => {
                info!(path = %path.display(), "Removed installed binary");
                Ok(UninstallOutcome::Removed(path))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No installed binary");
                Ok(UninstallOutcome::NotInstalled(path))
            }
            Err(e) => Err(ManagerError::RemoveFailed { path, source: e }),
        }
    }
}
