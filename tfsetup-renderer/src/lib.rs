//! # tfsetup-renderer
//!
//! Tera-based template engine that renders tfsetup templates against a
//! [`tfsetup_core::RenderingContext`], with a utility filter pack layered on
//! Tera's built-ins (see [`functions`]).
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tfsetup_core::RenderingContext;
//! use tfsetup_renderer::TemplateEngine;
//!
//! fn render_one(ctx: &RenderingContext) {
//!     let engine = TemplateEngine::new();
//!     match engine.render("inline", "{{ Config.name | upper }}", ctx) {
//!         Ok(bytes) => println!("{} bytes", bytes.len()),
//!         Err(e) => eprintln!("{e}"),
//!     }
//! }
//! ```

pub mod engine;
pub mod error;
pub mod functions;

pub use engine::{to_tera_context, TemplateEngine};
pub use error::RenderError;
pub use tera::Context as TeraContext;
