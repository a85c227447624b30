use super::Entry;

/// Strips surrounding whitespace, including a byte order mark.
pub(crate) fn trim_text(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
}

/// Normalizes a user supplied code: surrounding whitespace removed, lowercased.
pub fn normalize_code(code: &str) -> String {
    trim_text(code).to_lowercase()
}

/// Finds the first entry whose `code` equals the normalized `code`.
///
/// Only the query side is normalized; stored codes are compared as-is.
pub fn find_by_code<'a>(entries: &'a [Entry], code: &str) -> Option<&'a Entry> {
    let code = normalize_code(code);
    entries
        .iter()
        .find(|entry| entry.code() == Some(code.as_str()))
}
