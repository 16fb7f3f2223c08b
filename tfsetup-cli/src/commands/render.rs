//! `tfsetup --render`: template on stdin, rendered text on stdout.

use std::path::Path;

use anyhow::Result;
use tfsetup_core::Layout;
use tfsetup_sync::render_stream;

use super::Outcome;

pub fn run(workdir: &Path) -> Result<Outcome> {
    let stdin = std::io::stdin().lock();
    let stdout = std::io::stdout().lock();
    render_stream(workdir, &Layout::default(), stdin, stdout)?;
    Ok(Outcome::Done)
}
