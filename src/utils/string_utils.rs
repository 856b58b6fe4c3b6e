//! String helpers shared by extraction and persistence

use super::constants::MAX_FILENAME_LENGTH;

/// Safely truncate a string to a maximum number of characters (not bytes).
///
/// Never splits a multi-byte character, so it is safe on the Italian report
/// text (accented vowels) and on arbitrary section names.
#[inline]
pub fn safe_truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        None => s,
        Some((byte_idx, _)) => &s[..byte_idx],
    }
}

/// Turn a section name into the name part of a persisted file.
///
/// Spaces become underscores, characters that are invalid in file names are
/// dropped, and the result is capped at [`MAX_FILENAME_LENGTH`] characters.
#[must_use]
pub fn sanitize_section_name(name: &str) -> String {
    let underscored = name.trim().replace(char::is_whitespace, "_");
    let cleaned = sanitize_filename::sanitize(underscored);
    let truncated = safe_truncate_chars(&cleaned, MAX_FILENAME_LENGTH);
    if truncated.is_empty() {
        "Section".to_string()
    } else {
        truncated.to_string()
    }
}
