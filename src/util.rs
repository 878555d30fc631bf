//! Shared utility functions

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Fit `s` into `max_width` terminal columns, ending with `…` when cut.
///
/// Width is measured in display columns, so wide characters (CJK, emoji)
/// count double and a cut never lands inside a character.
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let budget = max_width - 1; // room for the ellipsis
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}

/// Shorten a UUID-like id to its first group for narrow columns
pub fn short_id(id: &str) -> &str {
    id.split('-').next().unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_shorter_than_max() {
        assert_eq!(truncate_to_width("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_adds_ellipsis() {
        assert_eq!(truncate_to_width("hello world", 6), "hello…");
    }

    #[test]
    fn test_truncate_wide_chars() {
        // Each of these is two columns wide
        let s = "日本語";
        assert_eq!(truncate_to_width(s, 6), "日本語");
        assert_eq!(truncate_to_width(s, 5), "日本…");
        assert_eq!(truncate_to_width(s, 4), "日…");
    }

    #[test]
    fn test_truncate_to_zero() {
        assert_eq!(truncate_to_width("hello", 0), "");
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("5b2c1a4e-9f3d-4c1b"), "5b2c1a4e");
        assert_eq!(short_id("plain"), "plain");
    }
}
