use feed_rs::parser;
use reqwest::blocking::Client;

use crate::errors::{FeedgrepError, FeedgrepResult};
use crate::sources::traits::{FeedFetcher, FetchedItem};

/// Upper bound on one feed retrieval; a slow feed is a per-source failure,
/// never a stalled cycle.
const FETCH_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

pub struct HttpFeedFetcher {
    client: Client,
}

impl HttpFeedFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .timeout(FETCH_TIMEOUT)
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    fn items_from_bytes(bytes: &[u8]) -> FeedgrepResult<Vec<FetchedItem>> {
        let parsed = parser::parse(bytes).map_err(|e| FeedgrepError::FeedParse(e.to_string()))?;

        let items = parsed
            .entries
            .into_iter()
            .filter_map(|entry| {
                let link = entry.links.first().map(|l| l.href.clone())?;
                // Prefer the feed's id; feed-rs synthesizes one from the link
                // when the feed omits it, so fall back explicitly.
                let guid = if entry.id.is_empty() {
                    link.clone()
                } else {
                    entry.id
                };

                let title = entry
                    .title
                    .map(|t| t.content)
                    .unwrap_or_else(|| "Untitled".to_string());
                let description = entry
                    .summary
                    .map(|s| s.content)
                    .unwrap_or_default();
                let published_at = entry
                    .published
                    .or(entry.updated)
                    .map(|dt| dt.to_rfc3339())
                    .unwrap_or_default();

                Some(FetchedItem {
                    guid,
                    link,
                    title,
                    description,
                    published_at,
                })
            })
            .collect();

        Ok(items)
    }
}

impl Default for HttpFeedFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedFetcher for HttpFeedFetcher {
    fn fetch(&self, url: &str) -> FeedgrepResult<Vec<FetchedItem>> {
        let wrap = |reason: String| FeedgrepError::FeedFetch {
            url: url.to_string(),
            reason,
        };

        let response = self.client.get(url).send().map_err(|e| wrap(e.to_string()))?;
        let response = response
            .error_for_status()
            .map_err(|e| wrap(e.to_string()))?;
        let bytes = response.bytes().map_err(|e| wrap(e.to_string()))?;

        Self::items_from_bytes(&bytes).map_err(|e| wrap(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSS_SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Sample</title>
    <item>
      <title>With guid</title>
      <link>https://example.com/a</link>
      <description>first item</description>
      <guid>tag:example.com,2024:a</guid>
      <pubDate>Mon, 05 Aug 2024 10:00:00 GMT</pubDate>
    </item>
    <item>
      <title>Without guid</title>
      <link>https://example.com/b</link>
      <description>second item</description>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn test_parses_items_with_guid_fallback() {
        let items = HttpFeedFetcher::items_from_bytes(RSS_SAMPLE.as_bytes()).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].guid, "tag:example.com,2024:a");
        assert_eq!(items[0].link, "https://example.com/a");
        assert_eq!(items[0].description, "first item");
        assert!(!items[0].published_at.is_empty());

        assert_eq!(items[1].link, "https://example.com/b");
        assert!(!items[1].guid.is_empty());
        assert!(items[1].published_at.is_empty());
    }

    #[test]
    fn test_garbage_bytes_are_a_parse_error() {
        let err = HttpFeedFetcher::items_from_bytes(b"not a feed").unwrap_err();
        assert!(matches!(err, FeedgrepError::FeedParse(_)));
    }
}
