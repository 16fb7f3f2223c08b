//! Read-only replacement of generated files.
//!
//! ## `replace_read_only` protocol
//!
//! 1. Remove any stale `<path>.tfsetup.tmp` left by an interrupted run.
//! 2. Write the new bytes to `<path>.tfsetup.tmp`.
//! 3. Mark the temporary file read-only.
//! 4. Rename over `<path>` (the old file is removed first where rename cannot
//!    replace a read-only file).
//!
//! Readers therefore see either the old file or the complete new one, and
//! the result is always a fresh read-only file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{write_err, SyncError};

/// Current bytes of a generated file; `None` when it does not exist.
pub fn read_existing(path: &Path) -> Result<Option<Vec<u8>>, SyncError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(SyncError::ReadOutput {
            path: path.to_path_buf(),
            source: err,
        }),
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    PathBuf::from(format!("{}.tfsetup.tmp", path.display()))
}

/// Replace `path` with `content` as a fresh read-only file.
pub fn replace_read_only(path: &Path, content: &[u8]) -> Result<(), SyncError> {
    replace_read_only_with_tmp(path, content, &tmp_path(path))
}

fn replace_read_only_with_tmp(path: &Path, content: &[u8], tmp: &Path) -> Result<(), SyncError> {
    remove_if_present(tmp)?;
    std::fs::write(tmp, content).map_err(|e| write_err(tmp, e))?;

    let mut perms = std::fs::metadata(tmp)
        .map_err(|e| write_err(tmp, e))?
        .permissions();
    perms.set_readonly(true);
    if let Err(e) = std::fs::set_permissions(tmp, perms) {
        let _ = std::fs::remove_file(tmp);
        return Err(write_err(tmp, e));
    }

    if cfg!(windows) {
        remove_if_present(path)?;
    }
    if let Err(e) = std::fs::rename(tmp, path) {
        let _ = std::fs::remove_file(tmp);
        return Err(write_err(path, e));
    }
    Ok(())
}

fn remove_if_present(path: &Path) -> Result<(), SyncError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => Err(write_err(path, err)),
    }
}
