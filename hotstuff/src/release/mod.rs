//! Release identity: which archive belongs to this host and where it lives.
//!
//! - `platform`: host OS/architecture to target triple resolution
//! - `locator`: download URL construction
//! - `manifest`: package identity from `package.json`

mod locator;
mod manifest;
mod platform;

pub use locator::{archive_filename, ReleaseDescriptor};
pub use manifest::{PackageManifest, MANIFEST_FILENAME};
pub use platform::{
    format_platform_table, resolve_in, HostPlatform, SupportedPlatform, UnsupportedPlatform,
    SUPPORTED_PLATFORMS,
};
