use reqwest::blocking::Client;
use serde_json::json;

use crate::{http_client, ChannelError, ChannelSender};

/// Delivers through a Feishu bot webhook as a rich-text post message.
pub struct FeishuSender {
    url: String,
    client: Client,
}

impl FeishuSender {
    pub fn new(url: &str) -> Result<Self, ChannelError> {
        Ok(Self {
            url: url.to_string(),
            client: http_client()?,
        })
    }

    fn payload(title: &str, content: &str) -> serde_json::Value {
        json!({
            "msg_type": "post",
            "content": {
                "post": {
                    "zh_cn": {
                        "title": title,
                        "content": [
                            [{ "tag": "text", "text": content }]
                        ]
                    }
                }
            }
        })
    }
}

impl ChannelSender for FeishuSender {
    fn kind(&self) -> &'static str {
        "feishu"
    }

    fn send(&self, title: &str, content: &str) -> Result<(), ChannelError> {
        let response = self
            .client
            .post(&self.url)
            .json(&Self::payload(title, content))
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
    fn test_payload_shape() {
        let payload = FeishuSender::payload("Daily", "1. item");
        assert_eq!(payload["msg_type"], "post");
        assert_eq!(payload["content"]["post"]["zh_cn"]["title"], "Daily");
        assert_eq!(
            payload["content"]["post"]["zh_cn"]["content"][0][0]["text"],
            "1. item"
        );
    }
}
