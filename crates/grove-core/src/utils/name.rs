//! Package name rules.
//!
//! Package names are restricted to `[a-z0-9_]+`. The same character class
//! decides where a legacy dependency line ends and its modifier symbols begin.

/// Check if a single character may appear in a package name
pub fn is_name_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'
}

/// Check if this is a valid package name
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(is_name_char)
}

/// Split a legacy dependency line into its bare name and trailing modifiers.
///
/// The line is trimmed, then every trailing character outside the name
/// class is peeled off and collected (in the order encountered, right to
/// left). Returns `None` when nothing is left of the name.
pub fn strip_modifiers(line: &str) -> Option<(String, Vec<char>)> {
    let trimmed = line.trim();
    let mut symbols = Vec::new();
    let mut end = trimmed.len();

    for (idx, c) in trimmed.char_indices().rev() {
        if is_name_char(c) {
            break;
        }
        symbols.push(c);
        end = idx;
    }

    let name = trimmed[..end].trim();
    if name.is_empty() {
        None
    } else {
        Some((name.to_string(), symbols))
    }
}
