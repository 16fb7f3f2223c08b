pub mod check;
pub mod generate;
pub mod render;

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Result};
use tfsetup_sync::formatter::find_executable;
use tfsetup_sync::FormatterConfig;

use crate::FormatArgs;

/// How a successful invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// `--check` found files that `--generate` would rewrite.
    OutOfDate,
}

/// Turn the formatter flags into a [`FormatterConfig`].
///
/// An explicit `--formatter` must exist; the default lookup silently falls
/// back to no formatting.
pub fn resolve_formatter(args: &FormatArgs) -> Result<FormatterConfig> {
    let config = if args.no_format {
        FormatterConfig::disabled()
    } else if let Some(cmd) = &args.formatter {
        FormatterConfig::with_command(locate(cmd)?)
    } else {
        FormatterConfig::detect()
    };
    Ok(match args.fmt_timeout {
        Some(secs) => config.with_timeout(Duration::from_secs(secs)),
        None => config,
    })
}

fn locate(cmd: &Path) -> Result<std::path::PathBuf> {
    if cmd.components().count() > 1 {
        if cmd.is_file() {
            return Ok(cmd.to_path_buf());
        }
    } else if let Some(found) = cmd.to_str().and_then(find_executable) {
        return Ok(found);
    }
    bail!("formatter {} not found", cmd.display())
}
