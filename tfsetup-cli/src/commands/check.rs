//! `tfsetup --check`: report drift without touching any file.

use std::path::Path;

use anyhow::Result;
use tfsetup_sync::{run as sync, FormatterConfig, SyncMode, SyncOptions, TargetStatus};

use super::Outcome;

pub fn run(workdir: &Path, formatter: FormatterConfig, show_diff: bool) -> Result<Outcome> {
    let options = SyncOptions::new(SyncMode::Check).with_formatter(formatter);
    let report = sync(workdir, &options)?;

    if show_diff {
        for target in report.drifted() {
            if let TargetStatus::Drifted { diff } = &target.status {
                print!("{diff}");
                if !diff.ends_with('\n') {
                    println!();
                }
            }
        }
    }

    let (all_current, err) = report.into_parts();
    if let Some(err) = err {
        return Err(err.into());
    }
    if !all_current {
        return Ok(Outcome::OutOfDate);
    }
    println!(r#"{{"message": "all files are current"}}"#);
    Ok(Outcome::Done)
}
