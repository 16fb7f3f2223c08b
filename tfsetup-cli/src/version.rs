//! `--min-version` gating.

use anyhow::{anyhow, bail, Result};
use semver::{BuildMetadata, Version};

/// Parse a release number the way operators write them: an optional leading
/// `v`, one to three numeric components (missing ones are zero), then an
/// optional `-pre` and `+build` suffix.
pub fn parse_version(text: &str) -> Result<Version, semver::Error> {
    let trimmed = text.trim();
    let unprefixed = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);
    let split = unprefixed.find(['-', '+']).unwrap_or(unprefixed.len());
    let (core, suffix) = unprefixed.split_at(split);
    let padding = match core.split('.').count() {
        1 => ".0.0",
        2 => ".0",
        _ => "",
    };
    Version::parse(&format!("{core}{padding}{suffix}"))
}

/// Build metadata never affects precedence.
fn precedence_key(version: &Version) -> Version {
    Version {
        build: BuildMetadata::EMPTY,
        ..version.clone()
    }
}

/// Fail unless `current` is at least `required`.
pub fn require_at_least(current: &str, required: &str) -> Result<()> {
    let min = parse_version(required)
        .map_err(|e| anyhow!("unable to parse {required} as version: {e}"))?;
    let this = parse_version(current)
        .map_err(|e| anyhow!("unable to parse {current} as version: {e}"))?;
    if precedence_key(&this) < precedence_key(&min) {
        bail!("this is tfsetup version {this}, but at least version {min} is required");
    }
    Ok(())
}
