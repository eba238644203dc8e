//! Streaming tar.gz extraction for release installation.
//!
//! The archive is decompressed and unpacked as it is read, so the download
//! never touches disk as a whole. Extraction is strict:
//! - entry paths must be relative and must not contain `..`
//! - link targets must stay inside the destination directory
//! - any malformed header or truncated stream aborts the install
//!
//! A non-directory file already present at an entry's destination is
//! unlinked before the entry is written, so a running binary can be replaced.

use std::fs;
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};

use flate2::read::GzDecoder;
use tar::{Archive, EntryType};
use tracing::debug;

use super::error::{ManagerError, ManagerResult};

/// Strict tar.gz extractor.
#[derive(Debug, Default)]
pub struct TarGzExtractor;

impl TarGzExtractor {
    /// Create a new extractor.
    pub fn new() -> Self {
        Self
    }

    /// Extract a gzip-compressed tar stream into `dest_dir`.
    ///
    /// # Returns
    ///
    /// The number of archive entries written.
    ///
    /// Files extracted before a failure are left in place.
    pub fn extract<R: Read>(&self, reader: R, dest_dir: &Path) -> ManagerResult<usize> {
        fs::create_dir_all(dest_dir).map_err(|e| ManagerError::CreateDirFailed {
            path: dest_dir.to_path_buf(),
            source: e,
        })?;

        let failed = |reason: String| ManagerError::ExtractionFailed {
            path: dest_dir.to_path_buf(),
            reason,
        };

        let root = fs::canonicalize(dest_dir).map_err(|e| ManagerError::ReadFailed {
            path: dest_dir.to_path_buf(),
            source: e,
        })?;

        let mut archive = Archive::new(GzDecoder::new(reader));
        archive.set_preserve_permissions(true);
        archive.set_overwrite(true);

        let entries = archive
            .entries()
            .map_err(|e| failed(format!("invalid archive: {}", e)))?;

        let mut count = 0;
        for entry in entries {
            let mut entry = entry.map_err(|e| failed(format!("corrupt archive entry: {}", e)))?;
            let path = entry
                .path()
                .map_err(|e| failed(format!("invalid entry path: {}", e)))?
                .into_owned();

            check_entry_path(&path).map_err(&failed)?;

            let entry_type = entry.header().entry_type();
            if let Some(link) = entry
                .link_name()
                .map_err(|e| failed(format!("invalid link target for {}: {}", path.display(), e)))?
            {
                check_link_target(&path, &link, entry_type).map_err(&failed)?;
            }

            if !entry_type.is_dir() {
                let target = dest_dir.join(&path);
                check_resolved_parent(&root, &target, &path).map_err(&failed)?;
                unlink_existing(&target)?;
            }

            let unpacked = entry
                .unpack_in(dest_dir)
                .map_err(|e| failed(format!("failed to unpack {}: {}", path.display(), e)))?;
            if !unpacked {
                return Err(failed(format!(
                    "entry {} escapes the target directory",
                    path.display()
                )));
            }

            debug!(path = %path.display(), "Extracted entry");
            count += 1;
        }

        Ok(count)
    }
}

/// Reject absolute paths and any `..` component.
fn check_entry_path(path: &Path) -> Result<(), String> {
    if path.as_os_str().is_empty() {
        return Err("archive contains an entry with an empty path".to_string());
    }

    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => {
                return Err(format!("entry {} has an absolute path", path.display()));
            }
            Component::ParentDir => {
                return Err(format!(
                    "entry {} escapes the target directory",
                    path.display()
                ));
            }
            Component::CurDir | Component::Normal(_) => {}
        }
    }

    Ok(())
}

/// Reject link targets that resolve outside the destination directory.
///
/// Symlink targets are relative to the link's own directory; hard link
/// targets are relative to the archive root.
fn check_link_target(path: &Path, link: &Path, entry_type: EntryType) -> Result<(), String> {
    let resolved: PathBuf = if entry_type == EntryType::Symlink {
        path.parent().unwrap_or(Path::new("")).join(link)
    } else {
        link.to_path_buf()
    };

    if escapes_root(&resolved) {
        return Err(format!(
            "link {} -> {} points outside the target directory",
            path.display(),
            link.display()
        ));
    }

    Ok(())
}

/// Lexically walk `path`, reporting whether it ever climbs above its root.
fn escapes_root(path: &Path) -> bool {
    let mut depth = 0usize;
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => return true,
            Component::ParentDir => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return true,
            },
            Component::Normal(_) => depth += 1,
            Component::CurDir => {}
        }
    }
    false
}

/// Reject entries whose parent directory, as it exists on disk, lies outside
/// `root`.
///
/// Earlier entries may have planted symlinks that each look harmless but
/// chain out of the destination, so the lexical checks are not enough once
/// files are on disk. A parent that does not exist yet is created by tar,
/// which performs its own containment check.
fn check_resolved_parent(root: &Path, target: &Path, path: &Path) -> Result<(), String> {
    let Some(parent) = target.parent() else {
        return Ok(());
    };

    match fs::canonicalize(parent) {
        Ok(resolved) if resolved.starts_with(root) => Ok(()),
        Ok(_) => Err(format!(
            "entry {} escapes the target directory through a symlink",
            path.display()
        )),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(format!("cannot resolve parent of {}: {}", path.display(), e)),
    }
}

/// Remove a pre-existing non-directory at `target`.
fn unlink_existing(target: &Path) -> ManagerResult<()> {
    match fs::symlink_metadata(target) {
        Ok(meta) if !meta.is_dir() => {
            fs::remove_file(target).map_err(|e| ManagerError::RemoveFailed {
                path: target.to_path_buf(),
                source: e,
            })
        }
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(ManagerError::ReadFailed {
            path: target.to_path_buf(),
            source: e,
        }),
    }
}
