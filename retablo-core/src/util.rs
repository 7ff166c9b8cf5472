//! Utility functions for Retablo

/// Truncates a string to at most `max_chars` characters.
///
/// Respects utf8 character boundaries.
///
/// ```
/// # use retablo_core::util::safe_truncate_utf8;
/// assert_eq!(safe_truncate_utf8("Paucartambo", 5), "Pauca");
/// assert_eq!(safe_truncate_utf8("Ñusta", 50), "Ñusta");
/// ```
pub fn safe_truncate_utf8(s: impl AsRef<str>, max_chars: usize) -> String {
    s.as_ref().chars().take(max_chars).collect()
}

/// Debug print a long string by truncating to n characters, followed by the full length
///
/// ```
/// # use retablo_core::util::debug_long_utf8;
/// let s = debug_long_utf8("ñ".repeat(10), 3);
///
/// assert_eq!(s, "ñññ (10)");
/// ```
pub fn debug_long_utf8(s: impl AsRef<str>, max_chars: usize) -> String {
    let trunc = safe_truncate_utf8(&s, max_chars);

    format!("{} ({})", trunc, s.as_ref().chars().count())
}
