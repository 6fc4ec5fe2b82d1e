//! Markdown-stripping transform shared by adapters whose targets only
//! accept plain text (WeWork text mode, email bodies).

use std::sync::OnceLock;

use regex::Regex;

fn link_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("valid regex"))
}

fn heading_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^#+\s*").expect("valid regex"))
}

/// Reduce simple markdown to plain text: `[text](url)` becomes `text (url)`,
/// heading markers are dropped, and emphasis/code punctuation is removed.
pub fn strip_markdown(content: &str) -> String {
    let content = link_re().replace_all(content, "$1 ($2)");
    let content = heading_re().replace_all(&content, "");
    content
        .chars()
        .filter(|c| !matches!(c, '*' | '_' | '~' | '`'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_links_become_text_with_url() {
        assert_eq!(
            strip_markdown("1. [Title](https://example.com/a)"),
            "1. Title (https://example.com/a)"
        );
    }

    #[test]
    fn test_headings_and_emphasis_are_dropped() {
        assert_eq!(
            strip_markdown("# Header\n**bold** and `code` and _em_"),
            "Header\nbold and code and em"
        );
    }

    #[test]
    fn test_plain_text_is_untouched() {
        assert_eq!(strip_markdown("nothing special here"), "nothing special here");
    }
}
