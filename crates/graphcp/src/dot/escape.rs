//! Quoting and escaping for DOT text

use crate::core::is_dot_keyword;

/// Returns true if `value` can be written without quotes
///
/// Bare DOT IDs are alphanumeric identifiers that do not start with a
/// digit, or numerals. Keywords always need quotes.
pub fn is_bare_id(value: &str) -> bool {
    if value.is_empty() || is_dot_keyword(value) {
        return false;
    }
    is_identifier(value) || is_numeral(value)
}

fn is_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|c| c.is_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

fn is_numeral(value: &str) -> bool {
    let digits = value.strip_prefix('-').unwrap_or(value);
    let mut seen_digit = false;
    let mut seen_dot = false;
    for c in digits.chars() {
        match c {
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => return false,
        }
    }
    seen_digit
}

/// Escape the contents of a double-quoted DOT string, without the quotes
pub fn escape_quoted(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            c if c.is_control() => {}
            c => escaped.push(c),
        }
    }
    escaped
}

/// Write `value` as a DOT ID, quoting it unless it is bare
pub fn quote(value: &str) -> String {
    if is_bare_id(value) {
        value.to_string()
    } else {
        format!("\"{}\"", escape_quoted(value))
    }
}

/// Escape text for use inside an HTML-like label
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            c if c.is_control() => {}
            c => escaped.push(c),
        }
    }
    escaped
}
