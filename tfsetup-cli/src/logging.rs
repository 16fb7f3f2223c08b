//! Tracing subscriber initialisation.
//!
//! Library crates only emit events; this is the one place a subscriber is
//! installed. Output goes to stderr so stdout stays clean for `--render`.
//!
//! | Flag(s)  | Filter level                            |
//! |----------|-----------------------------------------|
//! | (none)   | WARN                                    |
//! | `-v`     | INFO                                    |
//! | `-vv`    | DEBUG                                   |
//! | `-vvv`   | TRACE                                   |
//! | `-q`     | ERROR, formatter warnings still shown   |
//!
//! `RUST_LOG` overrides all of the above if set.

use std::io::IsTerminal as _;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::LogArgs;

const CRATES: &[&str] = &["tfsetup", "tfsetup_core", "tfsetup_renderer", "tfsetup_sync"];

/// Formatter failures change file contents, so `-q` never hides them.
const ALWAYS_WARN: &str = "tfsetup_sync::formatter=warn";

/// Install the global subscriber. Call once, before any event fires.
pub fn init_logging(args: &LogArgs) -> anyhow::Result<()> {
    let level = derive_level(args);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(level)));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .without_time()
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialise tracing: {e}"))
}

fn derive_level(args: &LogArgs) -> &'static str {
    if args.quiet {
        return "error";
    }
    match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn filter_directives(level: &str) -> String {
    let mut directives: Vec<String> = CRATES
        .iter()
        .map(|krate| format!("{krate}={level}"))
        .collect();
    if level == "error" {
        directives.push(ALWAYS_WARN.to_string());
    }
    directives.join(",")
}
