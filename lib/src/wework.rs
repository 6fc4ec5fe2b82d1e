use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::markdown::strip_markdown;
use crate::{http_client, ChannelError, ChannelSender};

/// WeWork webhook body flavor. Text messages cannot carry markdown, so that
/// mode runs the content through the shared markdown strip first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeworkMsgType {
    #[default]
    Text,
    Markdown,
}

/// Delivers through a WeWork (企业微信) group-bot webhook.
pub struct WeworkSender {
    url: String,
    msg_type: WeworkMsgType,
    client: Client,
}

impl WeworkSender {
    pub fn new(url: &str, msg_type: WeworkMsgType) -> Result<Self, ChannelError> {
        Ok(Self {
            url: url.to_string(),
            msg_type,
            client: http_client()?,
        })
    }

    fn payload(msg_type: WeworkMsgType, title: &str, content: &str) -> serde_json::Value {
        match msg_type {
            WeworkMsgType::Text => json!({
                "msgtype": "text",
                "text": {
                    "content": format!("{}\n\n{}", title, strip_markdown(content))
                }
            }),
            WeworkMsgType::Markdown => json!({
                "msgtype": "markdown",
                "markdown": {
                    "content": format!("# {}\n\n{}", title, content)
                }
            }),
        }
    }
}

impl ChannelSender for WeworkSender {
    fn kind(&self) -> &'static str {
        "wework"
    }

    fn send(&self, title: &str, content: &str) -> Result<(), ChannelError> {
        let response = self
            .client
            .post(&self.url)
            .json(&Self::payload(self.msg_type, title, content))
            .send()?;

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
    fn test_text_mode_strips_markdown() {
        let payload =
            WeworkSender::payload(WeworkMsgType::Text, "Alert", "1. [A](https://e.com/a)");
        assert_eq!(payload["msgtype"], "text");
        let content = payload["text"]["content"].as_str().unwrap();
        assert!(content.starts_with("Alert\n\n"));
        assert!(content.contains("A (https://e.com/a)"));
        assert!(!content.contains("]("));
    }

    #[test]
    fn test_markdown_mode_keeps_links_and_adds_heading() {
        let payload =
            WeworkSender::payload(WeworkMsgType::Markdown, "Alert", "1. [A](https://e.com/a)");
        assert_eq!(payload["msgtype"], "markdown");
        let content = payload["markdown"]["content"].as_str().unwrap();
        assert!(content.starts_with("# Alert"));
        assert!(content.contains("[A](https://e.com/a)"));
    }
}
