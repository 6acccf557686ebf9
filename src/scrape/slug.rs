//! Slug derivation for scraped titles.
//!
//! Two deliberately different flavors: video slugs are strict ASCII because
//! the video source only publishes Latin titles, album slugs keep non-ASCII
//! word characters because cosplay titles routinely carry CJK names that
//! would otherwise slug to nothing. Do not unify them.

/// Strict ASCII slug: lowercase `[a-z0-9]` runs joined by single hyphens.
/// Everything else is dropped, leading/trailing separators trimmed.
pub fn ascii_slug(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut pending_sep = false;
    for ch in title.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('-');
            }
            pending_sep = false;
            out.push(ch.to_ascii_lowercase());
        } else if ch.is_whitespace() || ch == '-' || ch == '_' {
            pending_sep = true;
        }
    }
    out
}

/// Permissive slug: whitespace runs become single hyphens, ASCII letters are
/// lowercased, ASCII punctuation is dropped, and every non-ASCII character
/// (CJK titles, accented names) passes through lowercased.
pub fn unicode_slug(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut pending_sep = false;
    for ch in title.trim().chars() {
        if ch.is_whitespace() {
            pending_sep = true;
        } else if ch.is_ascii() {
            if ch.is_ascii_alphanumeric() {
                if pending_sep && !out.is_empty() {
                    out.push('-');
                }
                pending_sep = false;
                out.push(ch.to_ascii_lowercase());
            } else if ch == '-' || ch == '_' {
                pending_sep = true;
            }
        } else {
            if pending_sep && !out.is_empty() {
                out.push('-');
            }
            pending_sep = false;
            for lower in ch.to_lowercase() {
                out.push(lower);
            }
        }
    }
    out
}
