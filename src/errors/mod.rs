use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedgrepError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    // Feed errors
    #[error("Invalid feed URL: {0}")]
    InvalidUrl(String),

    #[error("Feed fetch failed for {url}: {reason}")]
    FeedFetch { url: String, reason: String },

    #[error("Feed parsing failed: {0}")]
    FeedParse(String),

    // Network errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    // Storage errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    // Query errors
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    // Notification errors
    #[error("Notification failed: {0}")]
    Notification(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // User input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Channel errors from the push adapter library
    #[error("Channel error: {0}")]
    Channel(String),
}

impl From<channels::ChannelError> for FeedgrepError {
    fn from(err: channels::ChannelError) -> Self {
        FeedgrepError::Channel(err.to_string())
    }
}

pub type FeedgrepResult<T> = Result<T, FeedgrepError>;
