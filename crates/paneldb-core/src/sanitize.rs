//! Pure escaping/validation guards for query and markup construction.
//!
//! Every function here is total: it never fails, and empty input yields
//! empty output. These guard identifiers and values that end up embedded
//! as text; values bound as query parameters bypass sanitization.

/// Default maximum length (in characters) for sanitized search terms.
pub const SEARCH_QUERY_MAX_LEN: usize = 255;

/// Prepare free text for use inside a `LIKE` pattern.
///
/// Trims surrounding whitespace, escapes backslash before the wildcard
/// characters `%` and `_` (so wildcard escapes are not re-escaped), and
/// truncates to `max_len` characters last.
#[must_use]
pub fn sanitize_search_query(text: &str, max_len: usize) -> String {
    let trimmed = text.trim();

    let mut out = String::with_capacity(trimmed.len());
    for c in trimmed.chars() {
        match c {
            '\\' | '%' | '_' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }

    if out.chars().count() > max_len {
        out = out.chars().take(max_len).collect();
    }

    out
}

/// Whether `text` is safe to splice into a query fragment as an
/// identifier: `[A-Za-z_][A-Za-z0-9_]*` over the whole string.
///
/// Callers must reject identifiers failing this check before they reach
/// any connector.
#[must_use]
pub fn is_valid_column_name(text: &str) -> bool {
    let mut chars = text.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Escape text for embedding in HTML markup.
///
/// Ampersand is replaced first so the other substitutions' output is not
/// re-escaped; the remaining replacements follow a fixed order.
#[must_use]
pub fn sanitize_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            _ => out.push(c),
        }
    }

    out
}
