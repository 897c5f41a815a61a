//! Path utilities for package directories.

/// Check if a directory entry is hidden (`.git`, `.svn`, ...)
pub fn is_hidden(entry_name: &str) -> bool {
    entry_name.starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_hidden() {
        assert!(is_hidden(".git"));
        assert!(is_hidden(".hidden_pkg"));
        assert!(!is_hidden("default"));
        assert!(!is_hidden("not.hidden"));
    }
}
