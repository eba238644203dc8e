//! CLI error type.

use hotstuff::manager::ManagerError;
use thiserror::Error;

/// Errors surfaced to the user by the installer commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Install or uninstall failed in the library.
    #[error("{0}")]
    Manager(#[from] ManagerError),

    /// Invalid command-line configuration.
    #[error("{0}")]
    Config(String),
}
