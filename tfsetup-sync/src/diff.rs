//! Unified diffs for drifted targets, shown by `tfsetup --check --diff`.

use similar::TextDiff;

/// Diff `existing` (on disk, `None` when absent) against `expected` (what
/// generation would write). Headers are `a/<name>` and `b/<name>`.
///
/// Non-UTF-8 bytes are replaced rather than rejected; the diff is for humans,
/// the drift decision itself is byte-exact.
pub fn unified_diff(name: &str, existing: Option<&[u8]>, expected: &[u8]) -> String {
    let old = existing.map(String::from_utf8_lossy).unwrap_or_default();
    let new = String::from_utf8_lossy(expected);
    let old_header = if existing.is_some() {
        format!("a/{name}")
    } else {
        "/dev/null".to_string()
    };
    let new_header = format!("b/{name}");
    TextDiff::from_lines(old.as_ref(), new.as_ref())
        .unified_diff()
        .header(&old_header, &new_header)
        .context_radius(3)
        .to_string()
}
