//! Helpers for cleaning values before they reach span attributes or the
//! filesystem.

use std::path::Path;

/// Returns only the filename component of a path (no directory).
///
/// Used for span fields so traces reveal which document was processed
/// without exposing where it lives.
pub fn redact_path(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unknown>")
        .to_string()
}

/// Replaces every character outside `[A-Za-z0-9._-]` (Unicode letters and
/// digits included) with `_` and trims leading and trailing underscores.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect::<String>()
        .trim_matches('_')
        .to_string()
}
