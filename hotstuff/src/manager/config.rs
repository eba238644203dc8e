//! Configuration for release installation and removal.

use std::path::PathBuf;
use std::time::Duration;

use super::error::{ManagerError, ManagerResult};

/// Default timeout for HTTP requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Redirect hops followed before the response is treated as terminal.
///
/// Release hosts answer the asset URL with a single redirect to storage.
pub const DEFAULT_REDIRECT_HOPS: usize = 1;

/// System directory the installed binary is linked into.
pub const DEFAULT_BIN_DIR: &str = "/usr/local/bin";

/// Configuration for the installer.
#[derive(Debug, Clone)]
pub struct InstallerConfig {
    /// Directory the release archive is extracted into.
    pub install_dir: PathBuf,

    /// HTTP request timeout.
    pub timeout: Duration,

    /// Maximum redirect hops to follow.
    pub redirect_hops: usize,

    /// User agent sent with requests.
    pub user_agent: String,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            install_dir: PathBuf::from("."),
            timeout: DEFAULT_TIMEOUT,
            redirect_hops: DEFAULT_REDIRECT_HOPS,
            user_agent: format!("hotstuff-installer/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl InstallerConfig {
    /// Create a new configuration with the given install directory.
    pub fn new(install_dir: PathBuf) -> Self {
        Self {
            install_dir,
            ..Default::default()
        }
    }

    /// Set the HTTP timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the maximum number of redirect hops.
    pub fn with_redirect_hops(mut self, hops: usize) -> Self {
        self.redirect_hops = hops;
        self
    }

    /// Set the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Check the configuration before any request is made.
    pub fn validate(&self) -> ManagerResult<()> {
        if self.timeout.is_zero() {
            return Err(ManagerError::InvalidConfig(
                "timeout must be greater than zero".to_string(),
            ));
        }
        if self.user_agent.trim().is_empty() {
            return Err(ManagerError::InvalidConfig(
                "user agent must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration for the uninstaller.
#[derive(Debug, Clone)]
pub struct UninstallConfig {
    /// Directory holding the installed binary.
    pub bin_dir: PathBuf,
}

impl Default for UninstallConfig {
    fn default() -> Self {
        Self {
            bin_dir: PathBuf::from(DEFAULT_BIN_DIR),
        }
    }
}

impl UninstallConfig {
    pub fn new(bin_dir: PathBuf) -> Self {
        Self { bin_dir }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = InstallerConfig::default();
        assert_eq!(config.install_dir, PathBuf::from("."));
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.redirect_hops, 1);
        assert!(config.user_agent.starts_with("hotstuff-installer/"));
    }

    #[test]
    fn test_builder_pattern() {
        let config = InstallerConfig::new(PathBuf::from("/opt/pkg"))
            .with_timeout(Duration::from_secs(10))
            .with_redirect_hops(3)
            .with_user_agent("test-agent");

        assert_eq!(config.install_dir, PathBuf::from("/opt/pkg"));
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.redirect_hops, 3);
        assert_eq!(config.user_agent, "test-agent");
    }

    #[test]
    fn test_validate() {
        assert!(InstallerConfig::default().validate().is_ok());

        let err = InstallerConfig::default()
            .with_timeout(Duration::ZERO)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ManagerError::InvalidConfig(_)));

        assert!(InstallerConfig::default()
            .with_user_agent("  ")
            .validate()
            .is_err());
    }

    #[test]
    fn test_uninstall_default_bin_dir() {
        assert_eq!(
            UninstallConfig::default().bin_dir,
            PathBuf::from("/usr/local/bin")
        );
    }
}
