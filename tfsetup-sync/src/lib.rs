//! # tfsetup-sync
//!
//! Render-compare-write engine for tfsetup targets.
//!
//! Call [`pipeline::run`] with [`SyncMode::Generate`] to rewrite drifted
//! files or [`SyncMode::Check`] to only report drift, and
//! [`pipeline::render_stream`] to render a single template from a stream.

pub mod diff;
pub mod error;
pub mod formatter;
pub mod pipeline;
pub mod targets;
pub mod writer;

pub use error::SyncError;
pub use formatter::{FormatOutcome, FormatterConfig};
pub use pipeline::{
    render_stream, run, sync_dir, SyncMode, SyncOptions, SyncReport, TargetReport, TargetStatus,
};
pub use targets::TemplateTarget;
