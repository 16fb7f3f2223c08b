//! Upward search for the shared configuration directory.
//!
//! # API pattern
//!
//! - `find_dir_from(start, name)`: explicit start directory; used in tests
//!   with `TempDir`
//! - `find_dir(name)`: starts at the process working directory, delegates to
//!   `find_dir_from`

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::CoreError;

/// A directory found by [`find_dir_from`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    /// Full path of the found directory.
    pub dir: PathBuf,
    /// Path of the start directory relative to the found directory's parent.
    /// `.` when the start directory itself contains the found directory.
    pub rel_path: PathBuf,
}

impl Located {
    /// `rel_path` as the string handed to templates.
    pub fn rel_path_string(&self) -> String {
        self.rel_path.to_string_lossy().into_owned()
    }
}

/// Find the first directory at or above `start` that contains a subdirectory
/// called `name`.
///
/// `start` itself is checked first, then each ancestor up to and including
/// the filesystem root. A regular file called `name` does not match.
pub fn find_dir_from(start: &Path, name: &str) -> Result<Located, CoreError> {
    let start = if start.is_absolute() {
        start.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(CoreError::CurrentDir)?
            .join(start)
    };

    let not_found = || CoreError::NotFound {
        name: name.to_string(),
        start: start.clone(),
    };
    if name.is_empty() {
        return Err(not_found());
    }

    for dir in start.ancestors() {
        let candidate = dir.join(name);
        match std::fs::metadata(&candidate) {
            Ok(meta) if meta.is_dir() => {
                let rel_path = match start.strip_prefix(dir) {
                    Ok(rel) if rel.as_os_str().is_empty() => PathBuf::from("."),
                    Ok(rel) => rel.to_path_buf(),
                    Err(_) => PathBuf::from("."),
                };
                debug!("found {} (relative path {})", candidate.display(), rel_path.display());
                return Ok(Located {
                    dir: candidate,
                    rel_path,
                });
            }
            Ok(_) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => {
                return Err(CoreError::Inspect {
                    path: candidate,
                    source: err,
                })
            }
        }
    }

    Err(not_found())
}

/// [`find_dir_from`] starting at the current working directory.
pub fn find_dir(name: &str) -> Result<Located, CoreError> {
    let cwd = std::env::current_dir().map_err(CoreError::CurrentDir)?;
    find_dir_from(&cwd, name)
}
