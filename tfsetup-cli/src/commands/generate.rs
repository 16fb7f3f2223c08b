//! `tfsetup --generate`: rewrite every out-of-date file.

use std::path::Path;

use anyhow::Result;
use tfsetup_sync::{run as sync, FormatterConfig, SyncMode, SyncOptions};

use super::Outcome;

pub fn run(workdir: &Path, formatter: FormatterConfig) -> Result<Outcome> {
    let options = SyncOptions::new(SyncMode::Generate).with_formatter(formatter);
    let report = sync(workdir, &options)?;

    for target in report.updated() {
        println!("updated {}", target.target.output_name());
    }

    let (all_current, err) = report.into_parts();
    if let Some(err) = err {
        return Err(err.into());
    }
    if all_current {
        println!("all files are already current");
    }
    Ok(Outcome::Done)
}
