use reqwest::blocking::Client;
use serde_json::json;

use crate::{http_client, ChannelError, ChannelSender};

const FOOTER: &str = "FeedGrep RSS alerts";

/// Delivers via the Telegram Bot API `sendMessage` endpoint with HTML
/// formatting.
pub struct TelegramSender {
    url: String,
    chat_id: String,
    client: Client,
}

impl TelegramSender {
    pub fn new(bot_token: &str, chat_id: &str) -> Result<Self, ChannelError> {
        if bot_token.is_empty() {
            return Err(ChannelError::Config("bot_token is empty".to_string()));
        }

        Ok(Self {
            url: format!("https://api.telegram.org/bot{}/sendMessage", bot_token),
            chat_id: chat_id.to_string(),
            client: http_client()?,
        })
    }

    fn text(title: &str, content: &str) -> String {
        format!(
            "<b>{}</b>\n\n{}\n\n<i>{}</i>",
            escape_html(title),
            escape_html(content),
            FOOTER
        )
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

impl ChannelSender for TelegramSender {
    fn kind(&self) -> &'static str {
        "telegram"
    }

    fn send(&self, title: &str, content: &str) -> Result<(), ChannelError> {
        let payload = json!({
            "chat_id": self.chat_id,
            "text": Self::text(title, content),
            "parse_mode": "HTML",
        });

        let response = self.client.post(&self.url).json(&payload).send()?;
        if !response.status().is_success() {
            return Err(ChannelError::Rejected(response.status().as_u16()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_frames_title_and_footer() {
        let text = TelegramSender::text("Alert", "1. item");
        assert!(text.starts_with("<b>Alert</b>"));
        assert!(text.contains("1. item"));
        assert!(text.ends_with("<i>FeedGrep RSS alerts</i>"));
    }

    #[test]
    fn test_html_is_escaped() {
        let text = TelegramSender::text("a < b", "c & d");
        assert!(text.contains("a &lt; b"));
        assert!(text.contains("c &amp; d"));
    }

    #[test]
    fn test_empty_token_rejected() {
        assert!(matches!(
            TelegramSender::new("", "42").unwrap_err(),
            ChannelError::Config(_)
        ));
    }
}
