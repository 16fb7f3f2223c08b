//! Sync pipeline: render every target, compare with disk, report drift or
//! write.
//!
//! Per target:
//!
//! 1. Read the template source.
//! 2. Render it against the shared [`RenderingContext`].
//! 3. Run the formatter if it applies to the output name.
//! 4. Read the existing output (absent is fine).
//! 5. Compare bytes → `Current`, `Drifted` (check) or `Updated` (generate).
//!
//! Failures are collected per target; one broken template never stops the
//! remaining targets from being checked or written.

use std::io::{Read, Write};
use std::path::Path;

use tracing::{debug, info};

use tfsetup_core::{load_context, Layout, RenderingContext};
use tfsetup_renderer::{to_tera_context, TemplateEngine, TeraContext};

use crate::diff::unified_diff;
use crate::error::{template_err, SyncError};
use crate::formatter::{self, FormatterConfig};
use crate::targets::{convention_targets, fixed_target, TemplateTarget};
use crate::writer::{read_existing, replace_read_only};

// ---------------------------------------------------------------------------
// Options and results
// ---------------------------------------------------------------------------

/// Whether drifted targets are rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// Rewrite drifted files.
    Generate,
    /// Report drift, write nothing.
    Check,
}

impl SyncMode {
    pub fn allows_changes(self) -> bool {
        matches!(self, SyncMode::Generate)
    }
}

/// Everything a sync run needs besides the working directory.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub mode: SyncMode,
    pub layout: Layout,
    pub formatter: FormatterConfig,
}

impl SyncOptions {
    pub fn new(mode: SyncMode) -> Self {
        SyncOptions {
            mode,
            layout: Layout::default(),
            formatter: FormatterConfig::disabled(),
        }
    }

    pub fn with_formatter(mut self, formatter: FormatterConfig) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }
}

/// Outcome of reconciling one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetStatus {
    /// On-disk bytes already match.
    Current,
    /// Check mode: on-disk bytes differ. Carries a unified diff.
    Drifted { diff: String },
    /// Generate mode: the file was replaced.
    Updated,
}

/// One processed target and what happened to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetReport {
    pub target: TemplateTarget,
    pub status: TargetStatus,
    /// `true` when the formatter failed and its diagnostic was appended.
    pub format_failed: bool,
}

/// Aggregate result of a sync run.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Targets that were processed without error, in processing order.
    pub targets: Vec<TargetReport>,
    /// Per-target failures, in processing order.
    pub errors: Vec<SyncError>,
}

impl SyncReport {
    /// `true` when every target was already current and nothing failed.
    pub fn all_current(&self) -> bool {
        self.errors.is_empty()
            && self
                .targets
                .iter()
                .all(|t| t.status == TargetStatus::Current)
    }

    pub fn updated(&self) -> impl Iterator<Item = &TargetReport> {
        self.targets
            .iter()
            .filter(|t| t.status == TargetStatus::Updated)
    }

    pub fn drifted(&self) -> impl Iterator<Item = &TargetReport> {
        self.targets
            .iter()
            .filter(|t| matches!(t.status, TargetStatus::Drifted { .. }))
    }

    /// `(all_current, joined error)`.
    pub fn into_parts(self) -> (bool, Option<SyncError>) {
        let all_current = self.all_current();
        (all_current, SyncError::join(self.errors))
    }
}

// ---------------------------------------------------------------------------
// Per-target reconciliation
// ---------------------------------------------------------------------------

/// Render, format, compare and (in generate mode) write a single target.
pub fn sync_target(
    engine: &TemplateEngine,
    tera_ctx: &TeraContext,
    target: &TemplateTarget,
    options: &SyncOptions,
) -> Result<TargetReport, SyncError> {
    debug!(
        "target {} -> {}",
        target.input_path.display(),
        target.output_path.display()
    );
    let source = std::fs::read_to_string(&target.input_path)
        .map_err(|e| template_err(&target.input_path, e))?;
    let rendered = engine.render_with_tera_context(&target.template_name(), &source, tera_ctx)?;
    let formatted = formatter::format(&options.formatter, &target.output_path, rendered);
    let format_failed = formatted.is_failed();
    let expected = formatted.into_bytes();

    // A missing file matches an empty render; nothing is written for it.
    let existing = read_existing(&target.output_path)?;
    let status = if existing.as_deref().unwrap_or_default() == expected.as_slice() {
        debug!("current: {}", target.output_path.display());
        TargetStatus::Current
    } else if !options.mode.allows_changes() {
        debug!("drifted: {}", target.output_path.display());
        TargetStatus::Drifted {
            diff: unified_diff(&target.output_name(), existing.as_deref(), &expected),
        }
    } else {
        replace_read_only(&target.output_path, &expected)?;
        info!("updated {}", target.output_path.display());
        TargetStatus::Updated
    };

    Ok(TargetReport {
        target: target.clone(),
        status,
        format_failed,
    })
}

// ---------------------------------------------------------------------------
// Whole-directory runs
// ---------------------------------------------------------------------------

/// Process every target for `workdir` with an already-built context.
pub fn sync_dir(workdir: &Path, ctx: &RenderingContext, options: &SyncOptions) -> SyncReport {
    let mut report = SyncReport::default();
    let tera_ctx = match to_tera_context(ctx) {
        Ok(c) => c,
        Err(e) => {
            report.errors.push(e.into());
            return report;
        }
    };
    let engine = TemplateEngine::new();

    let mut targets = vec![fixed_target(workdir, ctx, &options.layout)];
    let listing_error = match convention_targets(workdir, &options.layout) {
        Ok(found) => {
            targets.extend(found);
            None
        }
        Err(e) => Some(e),
    };

    for target in &targets {
        match sync_target(&engine, &tera_ctx, target, options) {
            Ok(r) => report.targets.push(r),
            Err(e) => report.errors.push(e),
        }
    }
    report.errors.extend(listing_error);
    report
}

/// Load the context for `workdir` and process every target.
///
/// Context and discovery failures are returned as `Err` before any target is
/// touched; per-target failures end up in [`SyncReport::errors`].
pub fn run(workdir: &Path, options: &SyncOptions) -> Result<SyncReport, SyncError> {
    let ctx = load_context(workdir, &options.layout)?;
    Ok(sync_dir(workdir, &ctx, options))
}

// ---------------------------------------------------------------------------
// Render-to-stream
// ---------------------------------------------------------------------------

/// Render one template read from `input` and write the result to `output`.
///
/// No targets, no formatting, no comparison, no files written.
pub fn render_stream<R: Read, W: Write>(
    workdir: &Path,
    layout: &Layout,
    mut input: R,
    mut output: W,
) -> Result<(), SyncError> {
    let ctx = load_context(workdir, layout)?;
    let mut source = String::new();
    input
        .read_to_string(&mut source)
        .map_err(|e| SyncError::Stream {
            what: "reading standard input",
            source: e,
        })?;
    let rendered = TemplateEngine::new().render("stdin", &source, &ctx)?;
    output
        .write_all(&rendered)
        .and_then(|()| output.flush())
        .map_err(|e| SyncError::Stream {
            what: "writing standard output",
            source: e,
        })?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
