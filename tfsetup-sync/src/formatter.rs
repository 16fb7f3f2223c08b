//! External formatter post-processing (`tofu fmt -` / `terraform fmt -`).
//!
//! The formatter is resolved once at startup into a [`FormatterConfig`] and
//! passed to the sync engine; nothing here caches a lookup globally.
//!
//! Formatting is best effort:
//!
//! | Situation                         | Result                                      |
//! |-----------------------------------|---------------------------------------------|
//! | no formatter configured / found   | rendered bytes unchanged                    |
//! | output name lacks the suffix      | rendered bytes unchanged                    |
//! | formatter exits 0                 | formatter's stdout                          |
//! | non-zero exit, spawn error, hang  | rendered bytes + `/* --- OUTPUT FROM … */`  |

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

/// Executables tried, in order, when no formatter is given explicitly.
pub const DEFAULT_CANDIDATES: &[&str] = &["tofu", "terraform"];
/// Output files ending in this suffix are formatted.
pub const FORMATTED_SUFFIX: &str = ".tf";
/// Upper bound on a single formatter run.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const POLL_INTERVAL: Duration = Duration::from_millis(10);

// ---------------------------------------------------------------------------
// FormatterConfig
// ---------------------------------------------------------------------------

/// Which formatter to run, on which outputs, for how long.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatterConfig {
    /// Formatter executable; `None` disables formatting.
    pub command: Option<PathBuf>,
    /// Only outputs whose file name ends with this suffix are formatted.
    pub suffix: String,
    /// Kill the formatter and fall back to unformatted output after this long.
    pub timeout: Duration,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        FormatterConfig::disabled()
    }
}

impl FormatterConfig {
    /// No formatting at all.
    pub fn disabled() -> Self {
        FormatterConfig {
            command: None,
            suffix: FORMATTED_SUFFIX.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Use a specific formatter executable.
    pub fn with_command(command: impl Into<PathBuf>) -> Self {
        FormatterConfig {
            command: Some(command.into()),
            ..FormatterConfig::disabled()
        }
    }

    /// Look up [`DEFAULT_CANDIDATES`] on `PATH`; disabled when none is found.
    pub fn detect() -> Self {
        let command = DEFAULT_CANDIDATES.iter().find_map(|name| find_executable(name));
        match &command {
            Some(path) => debug!("formatter: {}", path.display()),
            None => debug!("formatter: none of {DEFAULT_CANDIDATES:?} on PATH"),
        }
        FormatterConfig {
            command,
            ..FormatterConfig::disabled()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `true` when a formatter is configured and `output` carries the suffix.
    pub fn applies_to(&self, output: &Path) -> bool {
        self.command.is_some()
            && output
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(self.suffix.as_str()))
    }

    /// Short name used in diagnostics (`tofu`, `terraform`, …).
    pub fn label(&self) -> String {
        self.command
            .as_deref()
            .and_then(|c| c.file_stem())
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Search `PATH` for an executable file called `name`.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .flat_map(|dir| executable_names(name).into_iter().map(move |n| dir.join(n)))
        .find(|candidate| is_executable(candidate))
}

#[cfg(windows)]
fn executable_names(name: &str) -> Vec<String> {
    vec![format!("{name}.exe"), name.to_string()]
}

#[cfg(not(windows))]
fn executable_names(name: &str) -> Vec<String> {
    vec![name.to_string()]
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// Result of the post-processing step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatOutcome {
    /// Formatting did not apply; bytes are the rendered output.
    Skipped(Vec<u8>),
    /// The formatter succeeded; bytes are its output.
    Formatted(Vec<u8>),
    /// The formatter failed; bytes are the rendered output with the
    /// diagnostic appended as a trailing comment block.
    Failed { output: Vec<u8>, diagnostic: String },
}

impl FormatOutcome {
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            FormatOutcome::Skipped(b) | FormatOutcome::Formatted(b) => b,
            FormatOutcome::Failed { output, .. } => output,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FormatOutcome::Failed { .. })
    }
}

/// Run the configured formatter over `rendered` if it applies to `output`.
///
/// Never returns an error: failures degrade to the unformatted bytes plus an
/// inline diagnostic, and a warning is logged.
pub fn format(config: &FormatterConfig, output: &Path, rendered: Vec<u8>) -> FormatOutcome {
    let Some(command) = config.command.as_deref() else {
        return FormatOutcome::Skipped(rendered);
    };
    if !config.applies_to(output) {
        return FormatOutcome::Skipped(rendered);
    }

    match run_formatter(command, &rendered, config.timeout) {
        Ok(formatted) => FormatOutcome::Formatted(formatted),
        Err(diagnostic) => {
            let label = config.label();
            warn!("{label} fmt: failed; output appended to file");
            let mut degraded = rendered;
            degraded.extend_from_slice(
                format!("/* --- OUTPUT FROM {label} fmt ---\n{diagnostic}\n*/\n").as_bytes(),
            );
            FormatOutcome::Failed {
                output: degraded,
                diagnostic,
            }
        }
    }
}

/// `<command> fmt -` with `input` on stdin. `Err` carries the diagnostic text.
fn run_formatter(command: &Path, input: &[u8], timeout: Duration) -> Result<Vec<u8>, String> {
    let mut child = Command::new(command)
        .args(["fmt", "-"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| format!("unable to run {}: {e}", command.display()))?;

    let stdin = child.stdin.take();
    let input = input.to_vec();
    let feeder = thread::spawn(move || {
        if let Some(mut stdin) = stdin {
            // A formatter that exits early closes the pipe; its exit status
            // carries the real failure.
            let _ = stdin.write_all(&input);
        }
    });
    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let started = Instant::now();
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) if started.elapsed() >= timeout => {
                let _ = child.kill();
                let _ = child.wait();
                let _ = feeder.join();
                return Err(format!("timed out after {}s", timeout.as_secs_f32()));
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(e) => {
                let _ = child.kill();
                return Err(format!("waiting for {}: {e}", command.display()));
            }
        }
    };

    let _ = feeder.join();
    let out = stdout.join().unwrap_or_default();
    let err = stderr.join().unwrap_or_default();
    if status.success() {
        Ok(out)
    } else {
        let mut diagnostic = String::from_utf8_lossy(&err).into_owned();
        if diagnostic.trim().is_empty() {
            diagnostic = format!("exited with {status}");
        }
        Err(diagnostic)
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        buf
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
