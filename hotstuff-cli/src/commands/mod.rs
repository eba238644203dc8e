//! Installer subcommands.

pub mod install;
pub mod uninstall;

use std::path::Path;

use hotstuff::release::{PackageManifest, MANIFEST_FILENAME};
use tracing::debug;

use crate::error::CliError;

/// Load the package manifest, defaulting to `package.json` in the working
/// directory.
fn load_manifest(path: Option<&Path>) -> Result<PackageManifest, CliError> {
    let path = path.unwrap_or(Path::new(MANIFEST_FILENAME));
    let manifest = PackageManifest::load(path)?;
    debug!(
        path = %path.display(),
        name = manifest.name(),
        version = %manifest.version(),
        "Loaded package manifest"
    );
    Ok(manifest)
}
