/// Truncate a string to at most `max_chars` characters, appending an
/// ellipsis when anything was cut. Used for previews and snippets.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let cut: String = s.chars().take(max_chars).collect();
    format!("{}...", cut)
}

/// Collapse newlines for one-line previews.
pub fn preview(s: &str, max_chars: usize) -> String {
    truncate(&s.replace('\n', " "), max_chars)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_is_char_aware() {
        assert_eq!(truncate("héllo", 10), "héllo");
        assert_eq!(truncate("héllo world", 5), "héllo...");
    }

    #[test]
    fn test_preview_flattens_newlines() {
        assert_eq!(preview("a\nb\nc", 10), "a b c");
    }
}
