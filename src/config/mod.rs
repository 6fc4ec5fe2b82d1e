use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use chrono::NaiveTime;
use serde::Deserialize;

use crate::domain::{FeedSource, KeywordRule};
use crate::errors::{FeedgrepError, FeedgrepResult};

/// Process configuration, loaded once at startup from a YAML file and
/// treated as read-only for the process lifetime.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_interval")]
    pub interval_minutes: u64,

    #[serde(default = "default_db_path")]
    pub db_path: String,

    /// Category name -> feeds in that category.
    #[serde(default)]
    pub categories: BTreeMap<String, Vec<SourceSpec>>,

    /// Standing keyword rules; accepts a bare expression string or a
    /// `{keywords, channels}` map (normalized in [`Config::rules`]).
    #[serde(default)]
    pub default_keywords: Vec<RuleSpec>,

    #[serde(default)]
    pub push: PushSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceSpec {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub channels: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RuleSpec {
    Expression(String),
    Full {
        keywords: String,
        #[serde(default)]
        channels: Vec<String>,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct PushSettings {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_true")]
    pub time_restriction_enabled: bool,

    #[serde(default = "default_time_start")]
    pub time_start: String,

    #[serde(default = "default_time_end")]
    pub time_end: String,

    /// Fixed reference zone for the delivery window, as hours east of UTC.
    #[serde(default = "default_utc_offset")]
    pub utc_offset: i32,

    /// When true, a keyword-rule push skips entries already delivered by a
    /// per-source push in the same cycle.
    #[serde(default)]
    pub dedupe_rule_pushes: bool,

    #[serde(default)]
    pub webhooks: HashMap<String, channels::ChannelConfig>,
}

impl Default for PushSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            time_restriction_enabled: true,
            time_start: default_time_start(),
            time_end: default_time_end(),
            utc_offset: default_utc_offset(),
            dedupe_rule_pushes: false,
            webhooks: HashMap::new(),
        }
    }
}

fn default_interval() -> u64 {
    30
}

fn default_db_path() -> String {
    "feedgrep.db".to_string()
}

fn default_true() -> bool {
    true
}

fn default_time_start() -> String {
    "08:00".to_string()
}

fn default_time_end() -> String {
    "22:00".to_string()
}

fn default_utc_offset() -> i32 {
    8
}

impl Config {
    /// Load configuration from `path`, or from `FEEDGREP_CONFIG` /
    /// `./feedgrep.yaml` when absent. `FEEDGREP_DB_PATH` overrides the
    /// database location. Fails before the scheduler ever starts on any
    /// missing or malformed required field.
    pub fn load(path: Option<&str>) -> FeedgrepResult<Self> {
        dotenvy::dotenv().ok();

        let path = match path {
            Some(p) => p.to_string(),
            None => std::env::var("FEEDGREP_CONFIG").unwrap_or_else(|_| "feedgrep.yaml".to_string()),
        };

        if !Path::new(&path).exists() {
            return Err(FeedgrepError::Config(format!(
                "config file not found: {}",
                path
            )));
        }

        let raw = std::fs::read_to_string(&path)?;
        Self::from_yaml(&raw)
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml(raw: &str) -> FeedgrepResult<Self> {
        let mut config: Config = serde_yaml::from_str(raw)?;

        if let Ok(db_path) = std::env::var("FEEDGREP_DB_PATH") {
            config.db_path = db_path;
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> FeedgrepResult<()> {
        if self.interval_minutes == 0 {
            return Err(FeedgrepError::Config(
                "interval_minutes must be at least 1".to_string(),
            ));
        }

        for (category, feeds) in &self.categories {
            for feed in feeds {
                if feed.name.trim().is_empty() {
                    return Err(FeedgrepError::Config(format!(
                        "feed in category '{}' is missing a name",
                        category
                    )));
                }
                url::Url::parse(&feed.url)
                    .map_err(|e| FeedgrepError::InvalidUrl(format!("{}: {}", feed.url, e)))?;
            }
        }

        for rule in self.rules() {
            if rule.expression.trim().is_empty() {
                return Err(FeedgrepError::Config(
                    "keyword rule has an empty expression".to_string(),
                ));
            }
        }

        for field in [&self.push.time_start, &self.push.time_end] {
            NaiveTime::parse_from_str(field, "%H:%M").map_err(|_| {
                FeedgrepError::Config(format!("invalid push window time: {}", field))
            })?;
        }

        if !(-12..=14).contains(&self.push.utc_offset) {
            return Err(FeedgrepError::Config(format!(
                "invalid utc_offset: {}",
                self.push.utc_offset
            )));
        }

        Ok(())
    }

    /// All configured feeds flattened into pipeline order, with their
    /// category stamped on.
    pub fn sources(&self) -> Vec<FeedSource> {
        self.categories
            .iter()
            .flat_map(|(category, feeds)| {
                feeds.iter().map(move |feed| {
                    FeedSource::new(&feed.name, &feed.url, category)
                        .with_channels(feed.channels.clone())
                })
            })
            .collect()
    }

    /// Keyword rules normalized to one shape; downstream code never sees the
    /// string-or-map duality.
    pub fn rules(&self) -> Vec<KeywordRule> {
        self.default_keywords
            .iter()
            .map(|spec| match spec {
                RuleSpec::Expression(expression) => KeywordRule::new(expression, Vec::new()),
                RuleSpec::Full { keywords, channels } => {
                    KeywordRule::new(keywords, channels.clone())
                }
            })
            .collect()
    }
}
