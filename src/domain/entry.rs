use serde::{Deserialize, Serialize};

/// A stored syndication item. Immutable once inserted; `guid` and `link`
/// are each unique across the store and together form the dedup key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub id: i64,
    pub title: String,
    pub link: String,
    pub description: String,
    /// Feed-provided publication time, passed through as-is.
    pub published_at: String,
    pub guid: String,
    pub category: String,
    pub source_name: String,
    /// Assigned by the store at insertion; drives newest-first ordering.
    pub ingested_at: String,
}

/// An entry candidate before insertion. Category and source name come from
/// configuration, not from the feed itself.
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub title: String,
    pub link: String,
    pub description: String,
    pub published_at: String,
    pub guid: String,
    pub category: String,
    pub source_name: String,
}

impl NewEntry {
    pub fn new(guid: String, link: String, title: String) -> Self {
        Self {
            title,
            link,
            description: String::new(),
            published_at: String::new(),
            guid,
            category: String::new(),
            source_name: String::new(),
        }
    }

    pub fn with_description(mut self, description: String) -> Self {
        self.description = description;
        self
    }

    pub fn with_published_at(mut self, published_at: String) -> Self {
        self.published_at = published_at;
        self
    }

    pub fn with_provenance(mut self, category: &str, source_name: &str) -> Self {
        self.category = category.to_string();
        self.source_name = source_name.to_string();
        self
    }
}
