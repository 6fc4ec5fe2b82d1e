use std::time::Duration;

use crate::domain::{Entry, NewEntry};
use crate::errors::FeedgrepResult;
use crate::query::KeywordQuery;

/// Upper bound on a single query's page size.
pub const MAX_LIMIT: u32 = 1000;

/// Result of an insertion attempt. A guid or link collision is the expected
/// steady-state outcome, not an error.
#[derive(Debug, Clone)]
pub enum InsertOutcome {
    Inserted(Entry),
    Duplicate,
}

impl InsertOutcome {
    pub fn is_inserted(&self) -> bool {
        matches!(self, InsertOutcome::Inserted(_))
    }
}

/// Filter for store reads: optional keyword predicate intersected with
/// optional category/source equality, newest first, paged.
#[derive(Debug, Clone)]
pub struct EntryQuery {
    pub keyword: Option<KeywordQuery>,
    pub category: Option<String>,
    pub source_name: Option<String>,
    pub limit: u32,
    pub offset: u32,
    /// Restrict to entries ingested within the trailing window; used to scope
    /// keyword-rule matching to the just-completed cycle.
    pub ingested_within: Option<Duration>,
}

impl Default for EntryQuery {
    fn default() -> Self {
        Self {
            keyword: None,
            category: None,
            source_name: None,
            limit: 10,
            offset: 0,
            ingested_within: None,
        }
    }
}

impl EntryQuery {
    pub fn with_keyword(mut self, keyword: KeywordQuery) -> Self {
        if !keyword.is_empty() {
            self.keyword = Some(keyword);
        }
        self
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn with_source(mut self, source_name: &str) -> Self {
        self.source_name = Some(source_name.to_string());
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    pub fn within(mut self, window: Duration) -> Self {
        self.ingested_within = Some(window);
        self
    }

    /// Limit as actually applied, clamped to `[1, MAX_LIMIT]`.
    pub fn clamped_limit(&self) -> u32 {
        self.limit.clamp(1, MAX_LIMIT)
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait EntryRepository: Send + Sync {
    /// True if either the guid or the link already exists in the store.
    fn exists(&self, guid: &str, link: &str) -> FeedgrepResult<bool>;

    /// Insert an entry, enforcing guid/link uniqueness atomically. Concurrent
    /// insertions of the same identity yield exactly one `Inserted`.
    fn insert(&self, entry: &NewEntry) -> FeedgrepResult<InsertOutcome>;

    /// Filtered retrieval, newest `ingested_at` first.
    fn search(&self, query: &EntryQuery) -> FeedgrepResult<Vec<Entry>>;

    /// Total stored entries.
    fn count(&self) -> FeedgrepResult<u64>;
}

// Lets one repository instance be shared between the pipeline and the
// scheduler's rule matching.
impl<T: EntryRepository + ?Sized> EntryRepository for std::sync::Arc<T> {
    fn exists(&self, guid: &str, link: &str) -> FeedgrepResult<bool> {
        (**self).exists(guid, link)
    }

    fn insert(&self, entry: &NewEntry) -> FeedgrepResult<InsertOutcome> {
        (**self).insert(entry)
    }

    fn search(&self, query: &EntryQuery) -> FeedgrepResult<Vec<Entry>> {
        (**self).search(query)
    }

    fn count(&self) -> FeedgrepResult<u64> {
        (**self).count()
    }
}
