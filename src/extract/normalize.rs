//! Locale-insensitive text normalization.
//!
//! The same normalization is applied to stored record text and to every
//! caller-supplied keyword, so matching is accent- and case-insensitive in
//! both directions.

use std::collections::BTreeSet;

use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

/// Strip diacritics and lowercase.
///
/// Decomposes to NFD, drops combining marks, lowercases. Total function:
/// any input produces output, and `normalize(normalize(s)) == normalize(s)`.
pub fn normalize(text: &str) -> String {
    text.nfd()
        .filter(|c| !unicode_normalization::char::is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Split normalized text into its word set.
///
/// Word boundaries follow Unicode segmentation, so punctuation never leaks
/// into a token. The set form gives O(log n) exclusion-keyword lookup.
pub fn tokenize(normalized: &str) -> BTreeSet<String> {
    normalized.unicode_words().map(String::from).collect()
}
