//! Tera rendering engine.
//!
//! Templates are supplied as text together with a name; the name only shows
//! up in diagnostics. Every render starts from a clone of a base [`Tera`]
//! instance that carries the utility filters from [`crate::functions`], so
//! templates never see each other.
//!
//! Autoescaping is disabled: output is HCL and plain text, never HTML.

use tera::{Context, Tera};
use tracing::debug;

use tfsetup_core::RenderingContext;

use crate::error::{describe, RenderError};
use crate::functions;

// ---------------------------------------------------------------------------
// Context conversion
// ---------------------------------------------------------------------------

/// Convert a [`RenderingContext`] into a [`tera::Context`] exposing `Config`,
/// `Project` and `Path`.
pub fn to_tera_context(ctx: &RenderingContext) -> Result<Context, RenderError> {
    Context::from_serialize(ctx).map_err(|e| RenderError::Context(describe(&e)))
}

// ---------------------------------------------------------------------------
// TemplateEngine
// ---------------------------------------------------------------------------

/// Tera-based engine with the utility filter pack registered.
///
/// Create once with [`TemplateEngine::new`] and reuse for every target.
#[derive(Clone)]
pub struct TemplateEngine {
    base: Tera,
}

impl TemplateEngine {
    pub fn new() -> Self {
        let mut base = Tera::default();
        base.autoescape_on(vec![]);
        functions::register(&mut base);
        TemplateEngine { base }
    }

    /// Parse `source` under `name` and evaluate it against `ctx`.
    pub fn render(
        &self,
        name: &str,
        source: &str,
        ctx: &RenderingContext,
    ) -> Result<Vec<u8>, RenderError> {
        let tera_ctx = to_tera_context(ctx)?;
        self.render_with_tera_context(name, source, &tera_ctx)
    }

    /// Same as [`TemplateEngine::render`] with a context already converted by
    /// [`to_tera_context`]; lets callers convert once for many templates.
    pub fn render_with_tera_context(
        &self,
        name: &str,
        source: &str,
        tera_ctx: &Context,
    ) -> Result<Vec<u8>, RenderError> {
        let mut tera = self.base.clone();
        tera.add_raw_template(name, source)
            .map_err(|e| RenderError::Parse {
                name: name.to_string(),
                detail: describe(&e),
            })?;
        let rendered = tera.render(name, tera_ctx).map_err(|e| RenderError::Eval {
            name: name.to_string(),
            detail: describe(&e),
        })?;
        debug!("rendered {name} ({} bytes)", rendered.len());
        Ok(rendered.into_bytes())
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
