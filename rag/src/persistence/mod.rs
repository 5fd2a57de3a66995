//! On-disk formats for the flat index and the metadata map.
//!
//! - Index file: `count: u32 LE`, `dimension: u32 LE`, then `count × dimension` `f32 LE`,
//!   row-major. See [`FlatIndex::save`](crate::FlatIndex::save) and
//!   [`FlatIndex::load`](crate::FlatIndex::load).
//! - Metadata file: a JSON object keyed by the decimal position. See
//!   [`MetadataMap::save`](crate::MetadataMap::save) and
//!   [`MetadataMap::load`](crate::MetadataMap::load).
//!
//! Files are written to a sibling temporary file first and renamed into place, so a failed write
//! never leaves a truncated file at the target path. An index and its map are staged together and
//! only renamed once both temporaries exist. Loading validates structure and fails
//! with [`RagError::CorruptPersistedState`](crate::RagError::CorruptPersistedState) instead of
//! guessing.

mod index_file;
mod metadata_file;

pub use index_file::HEADER_LEN;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{RagError, Result};

/// `path` with `suffix` appended to its file name.
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}

/// Sibling path used while a file is being written.
fn temp_path(path: &Path) -> PathBuf {
    sibling(path, ".tmp")
}

/// Sibling path holding the previous file while it is being replaced.
fn backup_path(path: &Path) -> PathBuf {
    sibling(path, ".bak")
}

/// Writes `bytes` to `path` through a temporary file and a rename.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    write_all_atomic(&[(path, bytes)])
}

/// Puts back the files replaced so far, newest first.
fn roll_back(committed: &[(&Path, Option<PathBuf>)]) {
    for (path, backup) in committed.iter().rev() {
        let _ = fs::remove_file(path);
        if let Some(backup) = backup {
            let _ = fs::rename(backup, path);
        }
    }
}

/// Moves `temp` onto `path`, keeping any previous file at its backup path.
fn replace(path: &Path, temp: &Path) -> Result<Option<PathBuf>> {
    let backup = if path.exists() {
        let backup = backup_path(path);
        fs::rename(path, &backup).map_err(|e| RagError::persistence(path, e))?;
        Some(backup)
    } else {
        None
    };

    if let Err(e) = fs::rename(temp, path) {
        if let Some(backup) = &backup {
            let _ = fs::rename(backup, path);
        }
        return Err(RagError::persistence(path, e));
    }
    Ok(backup)
}

/// Writes every file or none of them.
///
/// All temporary files are written before any target is touched. If a rename then fails, the
/// targets already replaced get their previous contents back.
pub(crate) fn write_all_atomic(files: &[(&Path, &[u8])]) -> Result<()> {
    for (path, _) in files {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| RagError::persistence(parent, e))?;
        }
    }

    let mut staged: Vec<PathBuf> = Vec::with_capacity(files.len());
    for (path, bytes) in files {
        let temp = temp_path(path);
        if let Err(e) = fs::write(&temp, bytes) {
            for written in &staged {
                let _ = fs::remove_file(written);
            }
            let _ = fs::remove_file(&temp);
            return Err(RagError::persistence(&temp, e));
        }
        staged.push(temp);
    }

    let mut committed = Vec::with_capacity(files.len());
    for ((path, _), temp) in files.iter().zip(&staged) {
        match replace(path, temp) {
            Ok(backup) => committed.push((*path, backup)),
            Err(e) => {
                roll_back(&committed);
                for temp in &staged {
                    let _ = fs::remove_file(temp);
                }
                return Err(e);
            }
        }
    }

    for (path, backup) in &committed {
        if let Some(backup) = backup {
            let _ = fs::remove_file(backup);
        }
        tracing::info!(path = %path.display(), "wrote file");
    }
    Ok(())
}

fn read(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| RagError::persistence(path, e))
}
