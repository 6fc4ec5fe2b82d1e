//! Push channel adapters for feedgrep.
//!
//! The core hands every adapter the same `(title, content)` pair, where
//! content is plain text with simple markdown links. Kind-specific wire
//! formatting (Feishu post cards, WeWork text/markdown, SMTP mail, Telegram
//! HTML) lives here, at the boundary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod email;
mod feishu;
pub mod markdown;
mod telegram;
mod wework;

pub use email::EmailSender;
pub use feishu::FeishuSender;
pub use markdown::strip_markdown;
pub use telegram::TelegramSender;
pub use wework::{WeworkMsgType, WeworkSender};

/// Bound on one delivery attempt; a stuck webhook must not stall the cycle.
pub(crate) const SEND_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum ChannelError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("delivery rejected with status {0}")]
    Rejected(u16),

    #[error("SMTP delivery failed: {0}")]
    Smtp(String),

    #[error("channel configuration error: {0}")]
    Config(String),
}

/// Kind-specific channel parameters, tagged by `type` in configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChannelConfig {
    Feishu {
        url: String,
    },
    Wework {
        url: String,
        #[serde(default)]
        wework_msg_type: WeworkMsgType,
    },
    Email {
        smtp_server: String,
        #[serde(default = "default_smtp_port")]
        smtp_port: u16,
        username: String,
        password: String,
        sender: String,
        receivers: Vec<String>,
    },
    Telegram {
        bot_token: String,
        chat_id: String,
    },
}

fn default_smtp_port() -> u16 {
    587
}

/// One delivery target. Implementations format and send; they never retry.
pub trait ChannelSender: Send + Sync {
    /// Channel kind for logs ("feishu", "wework", ...).
    fn kind(&self) -> &'static str;

    /// Deliver one message. Failure is reported, never escalated.
    fn send(&self, title: &str, content: &str) -> Result<(), ChannelError>;
}

/// Build the adapter for a channel definition.
pub fn build(config: &ChannelConfig) -> Result<Box<dyn ChannelSender>, ChannelError> {
    match config {
        ChannelConfig::Feishu { url } => Ok(Box::new(FeishuSender::new(url)?)),
        ChannelConfig::Wework {
            url,
            wework_msg_type,
        } => Ok(Box::new(WeworkSender::new(url, *wework_msg_type)?)),
        ChannelConfig::Email {
            smtp_server,
            smtp_port,
            username,
            password,
            sender,
            receivers,
        } => Ok(Box::new(EmailSender::new(
            smtp_server,
            *smtp_port,
            username,
            password,
            sender,
            receivers,
        )?)),
        ChannelConfig::Telegram { bot_token, chat_id } => {
            Ok(Box::new(TelegramSender::new(bot_token, chat_id)?))
        }
    }
}

pub(crate) fn http_client() -> Result<reqwest::blocking::Client, ChannelError> {
    Ok(reqwest::blocking::Client::builder()
        .timeout(SEND_TIMEOUT)
        .build()?)
}
