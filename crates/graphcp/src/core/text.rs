//! Label wrapping for DOT labels
//!
//! Graphviz sizes a node to fit its label, so a long label stretches the
//! whole rank. Labels are broken into lines before they reach the emitter.
//! Widths are counted in display columns; wide characters count double.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Width of `text` in display columns
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Break a label into lines of at most `max_width` display columns.
///
/// Explicit line breaks (`\n` or `\r\n`) are always kept. Within a line,
/// words are packed greedily and a word wider than `max_width` is split
/// across lines. A line that already fits is returned untouched, inner
/// spacing included. A `max_width` of 0 only splits on explicit breaks.
///
/// # Example
/// ```
/// use graphcp::core::wrap_label;
///
/// let lines = wrap_label("Payment gateway\nregion eu-west-1", 10);
/// assert_eq!(lines, vec!["Payment", "gateway", "region", "eu-west-1"]);
/// ```
pub fn wrap_label(label: &str, max_width: usize) -> Vec<String> {
    label
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .flat_map(|line| wrap_line(line, max_width))
        .collect()
}

fn wrap_line(line: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 || display_width(line) <= max_width {
        return vec![line.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in line.split_whitespace() {
        for piece in split_word(word, max_width) {
            let width = display_width(&piece);
            if !current.is_empty() && current_width + 1 + width <= max_width {
                current.push(' ');
                current.push_str(&piece);
                current_width += 1 + width;
            } else {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                current = piece;
                current_width = width;
            }
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

// Identifiers and paths often have no spaces; cut them at the column limit.
fn split_word(word: &str, max_width: usize) -> Vec<String> {
    if display_width(word) <= max_width {
        return vec![word.to_string()];
    }

    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut width = 0;
    for c in word.chars() {
        let char_width = c.width().unwrap_or(0);
        if width + char_width > max_width && !piece.is_empty() {
            pieces.push(std::mem::take(&mut piece));
            width = 0;
        }
        piece.push(c);
        width += char_width;
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}
