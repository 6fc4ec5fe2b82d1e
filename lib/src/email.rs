use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use crate::markdown::strip_markdown;
use crate::{ChannelError, ChannelSender, SEND_TIMEOUT};

const SIGNATURE: &str = "\n\n---\nFeedGrep RSS alerts";

/// Delivers as plain-text email over SMTP with STARTTLS.
pub struct EmailSender {
    transport: SmtpTransport,
    from: Mailbox,
    to: Vec<Mailbox>,
}

impl EmailSender {
    pub fn new(
        smtp_server: &str,
        smtp_port: u16,
        username: &str,
        password: &str,
        sender: &str,
        receivers: &[String],
    ) -> Result<Self, ChannelError> {
        let from: Mailbox = sender
            .parse()
            .map_err(|e: lettre::address::AddressError| ChannelError::Config(e.to_string()))?;

        let to = receivers
            .iter()
            .map(|addr| {
                addr.parse()
                    .map_err(|e: lettre::address::AddressError| ChannelError::Config(e.to_string()))
            })
            .collect::<Result<Vec<Mailbox>, _>>()?;

        if to.is_empty() {
            return Err(ChannelError::Config(
                "at least one receiver is required".to_string(),
            ));
        }

        let transport = SmtpTransport::starttls_relay(smtp_server)
            .map_err(|e| ChannelError::Config(e.to_string()))?
            .port(smtp_port)
            .credentials(Credentials::new(username.to_string(), password.to_string()))
            .timeout(Some(SEND_TIMEOUT))
            .build();

        Ok(Self {
            transport,
            from,
            to,
        })
    }
}

impl ChannelSender for EmailSender {
    fn kind(&self) -> &'static str {
        "email"
    }

    fn send(&self, title: &str, content: &str) -> Result<(), ChannelError> {
        let body = format!("{}{}", strip_markdown(content), SIGNATURE);

        for recipient in &self.to {
            let message = Message::builder()
                .from(self.from.clone())
                .to(recipient.clone())
                .subject(title)
                .body(body.clone())
                .map_err(|e| ChannelError::Smtp(e.to_string()))?;

            self.transport
                .send(&message)
                .map_err(|e| ChannelError::Smtp(e.to_string()))?;
        }

        Ok(())
    }
}
