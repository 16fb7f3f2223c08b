//! Error types for tfsetup-renderer.

use thiserror::Error;

/// All errors that can arise while rendering a template.
///
/// Tera reports the useful part of a failure (line, column, missing variable)
/// in the error's source chain; `detail` carries that chain flattened so the
/// message stands on its own when several errors are joined.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The template source is not valid Tera syntax.
    #[error("parse template {name}: {detail}")]
    Parse { name: String, detail: String },

    /// The template parsed but failed while evaluating against the context.
    #[error("evaluate template {name}: {detail}")]
    Eval { name: String, detail: String },

    /// The rendering context could not be converted into a Tera context.
    #[error("context serialization error: {0}")]
    Context(String),
}

impl RenderError {
    pub fn template_name(&self) -> Option<&str> {
        match self {
            RenderError::Parse { name, .. } | RenderError::Eval { name, .. } => Some(name),
            RenderError::Context(_) => None,
        }
    }
}

/// Flatten an error and its sources into `outer: inner: innermost`.
pub(crate) fn describe(err: &dyn std::error::Error) -> String {
    let mut parts = vec![err.to_string()];
    let mut source = err.source();
    while let Some(inner) = source {
        let text = inner.to_string();
        if parts.last() != Some(&text) {
            parts.push(text);
        }
        source = inner.source();
    }
    parts.join(": ")
}
