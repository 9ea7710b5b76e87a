//! Display-width helpers.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Width of a string in terminal cells.
pub fn visual_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate `s` to at most `max_width` cells, ending in `ellipsis` when cut.
pub fn truncate_to_width(s: &str, max_width: usize, ellipsis: &str) -> String {
    if visual_width(s) <= max_width {
        return s.to_string();
    }

    let budget = max_width.saturating_sub(visual_width(ellipsis));
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push_str(ellipsis);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visual_width() {
        assert_eq!(visual_width("hello"), 5);
        assert_eq!(visual_width("你好"), 4);
        assert_eq!(visual_width(""), 0);
    }

    #[test]
    fn test_truncate_not_needed() {
        assert_eq!(truncate_to_width("hello", 5, "..."), "hello");
    }

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate_to_width("hello world", 8, "..."), "hello...");
        assert_eq!(truncate_to_width("hello world", 6, "…"), "hello…");
    }

    #[test]
    fn test_truncate_wide_chars() {
        assert_eq!(truncate_to_width("你好世界", 5, "…"), "你好…");
    }
}
