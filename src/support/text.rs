//! Whitespace collapsing and length capping for scraped text.

use std::sync::LazyLock;

use regex::Regex;

pub const MAX_TEXT_LEN: usize = 50_000;

static TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("static tag pattern"));

/// Collapse any run of whitespace to a single space and cap at
/// [`MAX_TEXT_LEN`] characters. Empty and whitespace-only input yields `""`.
pub fn normalize(s: &str) -> String {
    let collapsed = s.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.chars().take(MAX_TEXT_LEN).collect()
}

/// Strip HTML tags, replacing each with a space, then normalize. Mirrors
/// `<[^>]+>`: an unclosed `<` with no following `>` is left untouched.
pub fn strip_html(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    normalize(&TAG_PATTERN.replace_all(raw, " "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_whitespace_runs() {
        assert_eq!(normalize("a   b\n\tc"), "a b c");
    }

    #[test]
    fn empty_and_whitespace_only_are_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \n\t  "), "");
    }

    #[test]
    fn caps_length() {
        let long = "a".repeat(60_000);
        assert_eq!(normalize(&long).len(), MAX_TEXT_LEN);
    }

    #[test]
    fn idempotent() {
        let s = "  foo   bar  baz ";
        assert_eq!(normalize(&normalize(s)), normalize(s));
    }

    #[test]
    fn strips_tags() {
        assert_eq!(strip_html("<p>Hello <strong>World</strong></p>"), "Hello World");
    }

    #[test]
    fn strip_html_empty() {
        assert_eq!(strip_html(""), "");
    }

    #[test]
    fn strip_html_leaves_unclosed_tag_intact() {
        assert_eq!(strip_html("Hello <strong World"), "Hello <strong World");
        assert_eq!(strip_html("a < b"), "a < b");
    }
}
