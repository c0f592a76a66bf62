//! Version extraction and comparison.

use regex::Regex;

/// Strip everything but digits and dots. Page content is untrusted; the
/// extracted string ends up in notifications and the cookie file.
pub fn sanitize(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect()
}

/// Numeric sort key: `"1.27.4"` → `[1, 27, 4]`. Non-numeric segments count
/// as zero so a malformed match never panics, just sorts low.
fn version_key(version: &str) -> Vec<u64> {
    version
        .split('.')
        .map(|part| part.parse().unwrap_or(0))
        .collect()
}

/// Extract the newest version advertised in `body`.
///
/// Uses the pattern's first capture group when present, the whole match
/// otherwise. Release pages often list several versions; the numerically
/// greatest one wins.
pub fn extract_latest(body: &str, pattern: &Regex) -> Option<String> {
    pattern
        .captures_iter(body)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(0)))
        .map(|m| sanitize(m.as_str()))
        .filter(|v| !v.is_empty())
        .max_by(|a, b| version_key(a).cmp(&version_key(b)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
