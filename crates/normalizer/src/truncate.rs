/// Truncate `s` to at most `max_chars` bytes at a valid UTF-8 boundary,
/// appending an ellipsis when truncation occurred.
pub fn truncate_with_ellipsis(s: &str, max_chars: usize) -> String {
    if s.len() <= max_chars {
        return s.to_string();
    }
    let boundary = floor_char_boundary(s, max_chars);
    format!("{}…", &s[..boundary])
}

fn floor_char_boundary(s: &str, index: usize) -> usize {
    let mut idx = index.min(s.len());
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_truncation_under_limit() {
        assert_eq!(truncate_with_ellipsis("hello", 10), "hello");
    }

    #[test]
    fn truncates_and_marks() {
        let result = truncate_with_ellipsis("abcdefghij", 5);
        assert!(result.starts_with("abcde"));
        assert!(result.ends_with('…'));
    }

    #[test]
    fn does_not_split_multibyte_chars() {
        let s = "a".repeat(4) + "é";
        let result = truncate_with_ellipsis(&s, 5);
        assert!(result.is_char_boundary(result.len() - '…'.len_utf8()));
    }
}
