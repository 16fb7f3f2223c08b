//! Error types for tfsetup-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while locating the shared configuration and
/// assembling the rendering context.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No directory with the requested name exists at or above the start
    /// directory.
    #[error("{name} not found as directory at or above {start}")]
    NotFound { name: String, start: PathBuf },

    /// The current working directory could not be determined.
    #[error("unable to determine current directory: {0}")]
    CurrentDir(#[source] std::io::Error),

    /// A filesystem error other than "not found" stopped the upward search.
    #[error("unable to inspect {path}: {source}")]
    Inspect {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A context file could not be read.
    #[error("read {path}: {source}")]
    ContextRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A context file is not valid JSON.
    #[error("decode {path}: {source}")]
    ContextParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl CoreError {
    /// `true` for the discovery failure, as opposed to read/parse problems.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::NotFound { .. })
    }
}

pub(crate) fn read_err(path: impl Into<PathBuf>, source: std::io::Error) -> CoreError {
    CoreError::ContextRead {
        path: path.into(),
        source,
    }
}

pub(crate) fn parse_err(path: impl Into<PathBuf>, source: serde_json::Error) -> CoreError {
    CoreError::ContextParse {
        path: path.into(),
        source,
    }
}
