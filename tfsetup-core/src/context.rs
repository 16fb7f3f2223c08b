//! The data every template sees.
//!
//! Templates get three top-level names:
//!
//! | Name      | Source                                                   |
//! |-----------|----------------------------------------------------------|
//! | `Config`  | `<shared dir>/context.json`                              |
//! | `Project` | `./tfsetup-context.json`                                 |
//! | `Path`    | working directory relative to the shared dir's parent    |
//!
//! Both JSON documents are kept as untyped [`serde_json::Value`] trees so
//! templates can reach arbitrary nested fields.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{parse_err, read_err, CoreError};
use crate::layout::Layout;
use crate::locate::find_dir_from;

/// Immutable rendering payload, built once per invocation and shared by every
/// target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderingContext {
    #[serde(rename = "Config")]
    config: Value,
    #[serde(rename = "Project")]
    project: Value,
    #[serde(rename = "Path")]
    path: String,
    #[serde(skip)]
    shared_config_path: PathBuf,
}

impl RenderingContext {
    /// Assemble a context from already-decoded values.
    pub fn new(
        config: Value,
        project: Value,
        path: impl Into<String>,
        shared_config_path: impl Into<PathBuf>,
    ) -> Self {
        RenderingContext {
            config,
            project,
            path: path.into(),
            shared_config_path: shared_config_path.into(),
        }
    }

    /// Decode both context documents from raw bytes.
    ///
    /// The project document is decoded first; error paths name
    /// [`Layout::default`]'s file names.
    pub fn from_bytes(
        project_bytes: &[u8],
        config_bytes: &[u8],
        path: impl Into<String>,
        shared_config_path: impl Into<PathBuf>,
    ) -> Result<Self, CoreError> {
        let layout = Layout::default();
        let project = decode(project_bytes, Path::new(&layout.project_context_file))?;
        let config = decode(config_bytes, Path::new(&layout.config_context_file))?;
        Ok(RenderingContext::new(config, project, path, shared_config_path))
    }

    pub fn config(&self) -> &Value {
        &self.config
    }

    pub fn project(&self) -> &Value {
        &self.project
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Location of the discovered shared configuration directory. Not visible
    /// to templates.
    pub fn shared_config_path(&self) -> &Path {
        &self.shared_config_path
    }
}

fn decode(bytes: &[u8], origin: &Path) -> Result<Value, CoreError> {
    serde_json::from_slice(bytes).map_err(|e| parse_err(origin, e))
}

/// Build the rendering context for a project rooted at `start`.
///
/// Order matters for diagnostics: the project context is read before the
/// shared directory is searched for, so running outside a project reports the
/// missing project context file.
pub fn load_context(start: &Path, layout: &Layout) -> Result<RenderingContext, CoreError> {
    let project_path = start.join(&layout.project_context_file);
    let project_bytes = std::fs::read(&project_path).map_err(|e| read_err(&project_path, e))?;

    let located = find_dir_from(start, &layout.config_dir)?;

    let config_path = layout.config_context_path(&located.dir);
    let config_bytes = std::fs::read(&config_path).map_err(|e| read_err(&config_path, e))?;

    let project = decode(&project_bytes, &project_path)?;
    let config = decode(&config_bytes, &config_path)?;
    debug!(
        "context loaded: shared={} path={}",
        located.dir.display(),
        located.rel_path.display()
    );

    Ok(RenderingContext::new(
        config,
        project,
        located.rel_path_string(),
        located.dir,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_bytes_decodes_both_documents() {
        let ctx = RenderingContext::from_bytes(
            br#"{"things": ["a", "b"]}"#,
            br#"{"name": "Potato"}"#,
            "x/y/z",
            "/shared",
        )
        .unwrap();
        assert_eq!(ctx.config(), &json!({"name": "Potato"}));
        assert_eq!(ctx.project(), &json!({"things": ["a", "b"]}));
        assert_eq!(ctx.path(), "x/y/z");
        assert_eq!(ctx.shared_config_path(), Path::new("/shared"));
    }

    #[test]
    fn from_bytes_names_bad_document() {
        let err = RenderingContext::from_bytes(b"{}", b"{not json", ".", "/shared").unwrap_err();
        assert!(matches!(err, CoreError::ContextParse { .. }), "got: {err}");
        assert!(err.to_string().contains("context.json"), "got: {err}");

        let err = RenderingContext::from_bytes(b"[", b"{}", ".", "/shared").unwrap_err();
        assert!(err.to_string().contains("tfsetup-context.json"), "got: {err}");
    }

    #[test]
    fn serialized_view_hides_shared_path() {
        let ctx = RenderingContext::new(json!(1), json!([true]), "p", "/secret");
        let value = serde_json::to_value(&ctx).unwrap();
        assert_eq!(value, json!({"Config": 1, "Project": [true], "Path": "p"}));
    }

    #[test]
    fn scalar_documents_are_accepted() {
        let ctx = RenderingContext::from_bytes(b"null", b"\"text\"", ".", "/s").unwrap();
        assert_eq!(ctx.project(), &Value::Null);
        assert_eq!(ctx.config(), &json!("text"));
    }
}
