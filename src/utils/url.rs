// src/utils/url.rs

//! URL manipulation utilities.

/// Resolve a potentially relative `href` against the page it appeared on.
///
/// Falls back to the raw href when the base itself does not parse.
pub fn resolve(base: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }

    match url::Url::parse(base).and_then(|b| b.join(href)) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => href.to_string(),
    }
}
