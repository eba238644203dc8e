//! Release installation and removal.
//!
//! # Architecture
//!
//! ```text
//! ReleaseInstaller
//!         │
//!         ├── HostPlatform::resolve  (release::platform)
//!         ├── ReleaseDescriptor      (release::locator)
//!         ├── Fetcher ── HttpTransport (trait)
//!         │                  └── ReqwestTransport
//!         └── TarGzExtractor
//!
//! Uninstaller ── removes {bin_dir}/{package_name}
//! ```

mod config;
mod error;
mod extractor;
mod fetch;
mod http;
mod installer;
mod uninstaller;

pub use config::{
    InstallerConfig, UninstallConfig, DEFAULT_BIN_DIR, DEFAULT_REDIRECT_HOPS, DEFAULT_TIMEOUT,
};
pub use error::{ManagerError, ManagerResult};
pub use extractor::TarGzExtractor;
pub use fetch::{Fetcher, ReleaseStream};
pub use http::{HttpResponse, HttpTransport, ReqwestTransport};
pub use installer::{InstallProgressCallback, InstallResult, InstallStage, ReleaseInstaller};
pub use uninstaller::{UninstallOutcome, Uninstaller};
