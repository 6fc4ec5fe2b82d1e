use crate::errors::FeedgrepResult;

/// One raw feed entry as retrieved, before provenance is attached.
#[derive(Debug, Clone)]
pub struct FetchedItem {
    /// Feed-provided id, falling back to the link when absent.
    pub guid: String,
    pub link: String,
    pub title: String,
    pub description: String,
    /// Publication time as the feed reported it; never re-parsed.
    pub published_at: String,
}

/// Retrieves and normalizes one feed's entries. A failure covers the whole
/// feed; the ingestion pipeline isolates it from other sources.
#[cfg_attr(test, mockall::automock)]
pub trait FeedFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> FeedgrepResult<Vec<FetchedItem>>;
}
