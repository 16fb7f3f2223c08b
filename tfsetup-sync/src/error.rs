//! Error types for tfsetup-sync.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use tfsetup_core::CoreError;
use tfsetup_renderer::RenderError;

/// All errors that can arise from sync operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Discovery or context loading failed; nothing can be rendered.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A template failed to parse or evaluate.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// A template source could not be read.
    #[error("reading {path}: {source}")]
    ReadTemplate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An existing output file exists but could not be read.
    #[error("reading existing {path}: {source}")]
    ReadOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The working directory could not be listed.
    #[error("error reading directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing a generated file failed.
    #[error("error writing {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading the template from, or writing the result to, a stream failed.
    #[error("{what}: {source}")]
    Stream {
        what: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// Several per-target failures, in target order.
    #[error("{}", JoinedErrors(.0))]
    Multiple(Vec<SyncError>),
}

impl SyncError {
    /// Combine collected errors: `None` when empty, the error itself when
    /// there is exactly one, [`SyncError::Multiple`] otherwise.
    pub fn join(mut errors: Vec<SyncError>) -> Option<SyncError> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(SyncError::Multiple(errors)),
        }
    }

    /// The individual errors, flattening [`SyncError::Multiple`].
    pub fn errors(&self) -> Vec<&SyncError> {
        match self {
            SyncError::Multiple(inner) => inner.iter().flat_map(|e| e.errors()).collect(),
            other => vec![other],
        }
    }
}

/// One error per line.
struct JoinedErrors<'a>(&'a [SyncError]);

impl fmt::Display for JoinedErrors<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

pub(crate) fn template_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::ReadTemplate {
        path: path.into(),
        source,
    }
}

pub(crate) fn write_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Write {
        path: path.into(),
        source,
    }
}
