use crate::domain::Entry;

/// Hard cap on rendered digest content. Items past the cap are dropped from
/// the message but stay retrievable through search.
const CONTENT_CAP: usize = 1500;

/// Maximum rows rendered into a keyword-rule digest.
const RULE_ROWS: usize = 10;

/// A rendered push, ready for channel fan-out. Content is plain text with
/// simple markdown links; kind-specific transformation happens in the
/// channel adapters.
#[derive(Debug, Clone)]
pub struct PushMessage {
    pub title: String,
    pub content: String,
}

impl PushMessage {
    /// Digest of one source's newly ingested entries: a numbered
    /// `[title](link)` list, truncated once the accumulated content would
    /// pass the cap, with a "plus N more" trailer for the rest.
    pub fn source_digest(source_name: &str, entries: &[Entry]) -> Self {
        let title = format!("{}: {} new items", source_name, entries.len());

        let mut content = String::new();
        let mut rendered = 0;

        for (i, entry) in entries.iter().enumerate() {
            let line = format!("{}. [{}]({})\n", i + 1, entry.title, entry.link);
            if content.chars().count() + line.chars().count() > CONTENT_CAP {
                break;
            }
            content.push_str(&line);
            rendered += 1;
        }

        let remaining = entries.len() - rendered;
        if remaining > 0 {
            content.push_str(&format!("...plus {} more", remaining));
        }

        Self { title, content }
    }

    /// Digest of a keyword rule's matches: up to ten `source: [title](link)`
    /// rows, titled with the match count and the rule's label term.
    pub fn rule_digest(label: &str, entries: &[Entry]) -> Self {
        let title = format!("{} matches for \"{}\"", entries.len(), label);

        let mut content = String::new();
        for entry in entries.iter().take(RULE_ROWS) {
            content.push_str(&format!(
                "- {}: [{}]({})\n",
                entry.source_name, entry.title, entry.link
            ));
        }

        if entries.len() > RULE_ROWS {
            content.push_str(&format!("...and {} more matches", entries.len() - RULE_ROWS));
        }

        Self { title, content }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(title: &str, link: &str) -> Entry {
        Entry {
            id: 0,
            title: title.to_string(),
            link: link.to_string(),
            description: String::new(),
            published_at: String::new(),
            guid: link.to_string(),
            category: "news".to_string(),
            source_name: "Example".to_string(),
            ingested_at: String::new(),
        }
    }

    #[test]
    fn test_source_digest_title_and_numbering() {
        let entries = vec![
            entry("First", "https://example.com/1"),
            entry("Second", "https://example.com/2"),
        ];

        let msg = PushMessage::source_digest("Example", &entries);

        assert_eq!(msg.title, "Example: 2 new items");
        assert!(msg.content.contains("1. [First](https://example.com/1)"));
        assert!(msg.content.contains("2. [Second](https://example.com/2)"));
        assert!(!msg.content.contains("more"));
    }

    #[test]
    fn test_source_digest_truncates_past_cap() {
        // Each line renders well over 100 chars, so 20 items blow past 1500.
        let entries: Vec<Entry> = (0..20)
            .map(|i| {
                entry(
                    &format!("Article {} {}", i, "x".repeat(100)),
                    &format!("https://example.com/{}", i),
                )
            })
            .collect();

        let msg = PushMessage::source_digest("Example", &entries);

        assert!(msg.content.chars().count() <= CONTENT_CAP + 32);
        assert!(msg.content.contains("plus"));
        assert!(msg.content.contains("more"));
        // The last items were never rendered.
        assert!(!msg.content.contains("https://example.com/19"));
    }

    #[test]
    fn test_rule_digest_caps_at_ten_rows() {
        let entries: Vec<Entry> = (0..13)
            .map(|i| entry(&format!("Match {}", i), &format!("https://example.com/{}", i)))
            .collect();

        let msg = PushMessage::rule_digest("rust", &entries);

        assert_eq!(msg.title, "13 matches for \"rust\"");
        assert!(msg.content.contains("Match 9"));
        assert!(!msg.content.contains("Match 10"));
        assert!(msg.content.contains("...and 3 more matches"));
    }

    #[test]
    fn test_rule_digest_small_set_has_no_overflow_note() {
        let entries = vec![entry("Only", "https://example.com/only")];
        let msg = PushMessage::rule_digest("rust", &entries);

        assert_eq!(msg.title, "1 matches for \"rust\"");
        assert!(!msg.content.contains("more matches"));
    }
}
