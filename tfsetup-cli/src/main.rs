//! tfsetup: generate and check Terraform setup files from shared templates.
//!
//! # Usage
//!
//! ```text
//! tfsetup --generate [--formatter CMD | --no-format] [--fmt-timeout SECS]
//! tfsetup --check [--diff] [--formatter CMD | --no-format]
//! tfsetup --render < template
//! tfsetup --min-version 1.1.0 --check
//! ```
//!
//! # Exit codes
//!
//! | Code | Meaning                          |
//! |------|----------------------------------|
//! |  0   | Success                          |
//! |  1   | `--check` found out-of-date files |
//! |  2   | Any error                        |

mod commands;
mod logging;
mod version;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgGroup, Args, Parser};
use tfsetup_core::CoreError;
use tracing::debug;

use commands::Outcome;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "tfsetup",
    version,
    about = "Generate Terraform setup files from a shared template directory",
    long_about = None,
)]
#[command(group(
    ArgGroup::new("mode")
        .required(true)
        .args(["generate", "check", "render"]),
))]
struct Cli {
    /// Regenerate outdated files.
    #[arg(long)]
    generate: bool,

    /// Check all generated files against expected output.
    #[arg(long)]
    check: bool,

    /// Render standard input with the current context.
    #[arg(long)]
    render: bool,

    /// Minimum required version of tfsetup.
    #[arg(long, value_name = "VERSION")]
    min_version: Option<String>,

    /// With --check, print a unified diff for every out-of-date file.
    #[arg(long, requires = "check")]
    diff: bool,

    #[command(flatten)]
    format: FormatArgs,

    #[command(flatten)]
    log: LogArgs,
}

/// Formatter selection.
#[derive(Args, Debug, Default)]
pub struct FormatArgs {
    /// Formatter executable run as `<CMD> fmt -` on generated `.tf` files
    /// (default: `tofu`, then `terraform`, if found on PATH).
    #[arg(long, value_name = "CMD", conflicts_with = "no_format")]
    pub formatter: Option<PathBuf>,

    /// Never run a formatter.
    #[arg(long)]
    pub no_format: bool,

    /// Seconds to wait for the formatter before giving up on it.
    #[arg(
        long,
        value_name = "SECS",
        value_parser = clap::value_parser!(u64).range(1..),
    )]
    pub fmt_timeout: Option<u64>,
}

/// Logging verbosity.
#[derive(Args, Debug, Default)]
pub struct LogArgs {
    /// Increase logging verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging(&cli.log) {
        eprintln!("error: {e}");
        return ExitCode::from(2);
    }

    match run(cli) {
        Ok(Outcome::Done) => ExitCode::SUCCESS,
        Ok(Outcome::OutOfDate) => {
            eprintln!(
                "error: some files are out of date; rerun tfsetup --generate and terraform init"
            );
            ExitCode::from(1)
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<Outcome> {
    if let Some(min) = &cli.min_version {
        version::require_at_least(env!("CARGO_PKG_VERSION"), min)?;
    }

    let workdir = std::env::current_dir().map_err(CoreError::CurrentDir)?;
    debug!("working directory: {}", workdir.display());

    if cli.render {
        return commands::render::run(&workdir);
    }

    let formatter = commands::resolve_formatter(&cli.format)?;
    if cli.check {
        commands::check::run(&workdir, formatter, cli.diff)
    } else {
        commands::generate::run(&workdir, formatter)
    }
}
