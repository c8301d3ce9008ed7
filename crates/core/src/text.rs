//! Text normalization for profile fields.
//!
//! All helpers accept an absent value and return an empty string for it,
//! so callers never need to branch on missing payload fields.

/// Capitalize the first word character of each whitespace-separated word
/// and lowercase the rest of the word.
///
/// Characters before the first word character of a word (such as an
/// opening parenthesis) are left untouched.
#[must_use]
pub fn title_case(input: Option<&str>) -> String {
    let Some(input) = input else {
        return String::new();
    };

    let mut out = String::with_capacity(input.len());
    let mut in_word = false;
    for c in input.chars() {
        if c.is_whitespace() {
            in_word = false;
            out.push(c);
        } else if in_word {
            out.extend(c.to_lowercase());
        } else if is_word_char(c) {
            in_word = true;
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Uppercase the whole input.
#[must_use]
pub fn upper_case(input: Option<&str>) -> String {
    input.map(str::to_uppercase).unwrap_or_default()
}

/// Escape the HTML-significant characters `& < > " '`.
#[must_use]
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
