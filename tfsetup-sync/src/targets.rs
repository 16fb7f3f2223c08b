//! Which templates produce which files.
//!
//! Every run has the fixed target `<shared dir>/setup.tmpl → setup.tf`, then
//! one target per `*.tfsetup.tmpl` file in the working directory, in file-name
//! order.

use std::path::{Path, PathBuf};

use tfsetup_core::{Layout, RenderingContext};

use crate::error::SyncError;

/// One (template source, output destination) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateTarget {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
}

impl TemplateTarget {
    pub fn new(input_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        TemplateTarget {
            input_path: input_path.into(),
            output_path: output_path.into(),
        }
    }

    /// Output file name, as printed to the operator.
    pub fn output_name(&self) -> String {
        self.output_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.output_path.display().to_string())
    }

    /// Name handed to the renderer for diagnostics.
    pub fn template_name(&self) -> String {
        self.input_path.display().to_string()
    }
}

/// The shared template rendered into the primary output file.
pub fn fixed_target(workdir: &Path, ctx: &RenderingContext, layout: &Layout) -> TemplateTarget {
    TemplateTarget::new(
        layout.config_template_path(ctx.shared_config_path()),
        workdir.join(&layout.setup_file),
    )
}

/// Every `*<template_suffix>` file directly inside `workdir`, sorted by name.
/// Directories and names without a usable output name are skipped.
pub fn convention_targets(workdir: &Path, layout: &Layout) -> Result<Vec<TemplateTarget>, SyncError> {
    let read_dir_err = |source| SyncError::ReadDir {
        path: workdir.to_path_buf(),
        source,
    };

    let mut targets = Vec::new();
    for entry in std::fs::read_dir(workdir).map_err(read_dir_err)? {
        let entry = entry.map_err(read_dir_err)?;
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        let Some(output) = layout.output_name_for(name) else {
            continue;
        };
        let input = entry.path();
        if input.is_dir() {
            continue;
        }
        targets.push(TemplateTarget::new(input, workdir.join(output)));
    }
    targets.sort_by(|a, b| a.input_path.cmp(&b.input_path));
    Ok(targets)
}
