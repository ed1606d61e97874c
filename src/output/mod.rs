// Output formatting: terminal display of books and result lists.

pub mod terminal;

/// Truncate a string to at most `max_chars` characters, appending "..." if truncated.
///
/// Unlike byte slicing (`&text[..40]`), this respects UTF-8 character boundaries
/// and will never panic on accented letters from latin-1 catalogs.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    let char_count = text.chars().count();
    if char_count <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate_chars("Café au lait", 4), "Café...");
        assert_eq!(truncate_chars("Emma", 10), "Emma");
    }
}
