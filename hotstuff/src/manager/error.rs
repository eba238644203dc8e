//! Error types for release installation.

use std::io;
use std::path::PathBuf;

use crate::release::UnsupportedPlatform;

/// Result type for manager operations.
pub type ManagerResult<T> = Result<T, ManagerError>;

/// Errors that can occur while installing or removing a release.
#[derive(Debug)]
pub enum ManagerError {
    /// Failed to read a file or directory.
    ReadFailed { path: PathBuf, source: io::Error },

    /// Failed to create a directory.
    CreateDirFailed { path: PathBuf, source: io::Error },

    /// Failed to remove an installed file.
    RemoveFailed { path: PathBuf, source: io::Error },

    /// `package.json` is missing required fields or has invalid values.
    ManifestInvalid { path: PathBuf, reason: String },

    /// The host has no published release.
    UnsupportedPlatform(UnsupportedPlatform),

    /// The server has no archive at the release URL.
    ReleaseNotFound { url: String },

    /// The request could not be completed.
    DownloadFailed { url: String, reason: String },

    /// Network timeout.
    Timeout { url: String, timeout_secs: u64 },

    /// The server answered with a status the installer does not handle.
    UnexpectedStatus { url: String, status: u16 },

    /// A redirect chain was longer than the configured hop limit.
    TooManyRedirects { url: String, hops: usize },

    /// Archive extraction failed.
    ExtractionFailed { path: PathBuf, reason: String },

    /// HTTP client could not be constructed.
    HttpError(String),

    /// Invalid configuration.
    InvalidConfig(String),
}

impl std::fmt::Display for ManagerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReadFailed { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            Self::CreateDirFailed { path, source } => {
                write!(
                    f,
                    "failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::RemoveFailed { path, source } => {
                write!(f, "failed to remove {}: {}", path.display(), source)
            }
            Self::ManifestInvalid { path, reason } => {
                write!(f, "invalid package manifest {}: {}", path.display(), reason)
            }
            Self::UnsupportedPlatform(e) => write!(f, "{}", e),
            Self::ReleaseNotFound { url } => {
                write!(
                    f,
                    "we could not find this release yet ({}). Are you sure you got the version right?",
                    url
                )
            }
            Self::DownloadFailed { url, reason } => {
                write!(f, "error fetching release {}: {}", url, reason)
            }
            Self::Timeout { url, timeout_secs } => {
                write!(f, "request to {} timed out after {}s", url, timeout_secs)
            }
            Self::UnexpectedStatus { url, status } => {
                write!(f, "unexpected HTTP status {} from {}", status, url)
            }
            Self::TooManyRedirects { url, hops } => {
                write!(
                    f,
                    "{} redirected more than {} time(s); not following further",
                    url, hops
                )
            }
            Self::ExtractionFailed { path, reason } => {
                write!(f, "failed to extract into {}: {}", path.display(), reason)
            }
            Self::HttpError(msg) => write!(f, "HTTP error: {}", msg),
            Self::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for ManagerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ReadFailed { source, .. } => Some(source),
            Self::CreateDirFailed { source, .. } => Some(source),
            Self::RemoveFailed { source, .. } => Some(source),
            Self::UnsupportedPlatform(e) => Some(e),
            _ => None,
        }
    }
}

impl From<UnsupportedPlatform> for ManagerError {
    fn from(e: UnsupportedPlatform) -> Self {
        Self::UnsupportedPlatform(e)
    }
}
