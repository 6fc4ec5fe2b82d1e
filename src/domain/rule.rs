use serde::{Deserialize, Serialize};

/// One configured feed, read per cycle by the ingestion pipeline.
/// Category and name are provenance stamped onto every entry the feed yields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedSource {
    pub name: String,
    pub url: String,
    pub category: String,
    /// Channels receiving a per-source digest when the feed yields new items.
    #[serde(default)]
    pub channels: Vec<String>,
}

impl FeedSource {
    pub fn new(name: &str, url: &str, category: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            category: category.to_string(),
            channels: Vec::new(),
        }
    }

    pub fn with_channels(mut self, channels: Vec<String>) -> Self {
        self.channels = channels;
        self
    }
}

/// A standing keyword alert evaluated after every ingestion cycle.
/// The expression uses the search grammar (`+required -excluded optional`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordRule {
    pub expression: String,
    #[serde(default)]
    pub channels: Vec<String>,
}

impl KeywordRule {
    pub fn new(expression: &str, channels: Vec<String>) -> Self {
        Self {
            expression: expression.to_string(),
            channels,
        }
    }
}
