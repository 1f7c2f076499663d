//! Outbound Email
//!
//! Order confirmations are the only mail this service sends. Delivery is
//! fire-and-forget: a failure is logged and never fails the request that
//! triggered it.

use lettre::message::header::ContentType;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::backend::server::config::MailConfig;

/// SMTP mailer
#[derive(Clone)]
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl Mailer {
    /// Build a mailer from configuration, `None` when SMTP is unset or the
    /// URL is invalid
    pub fn from_config(config: Option<&MailConfig>) -> Option<Self> {
        let config = config?;
        match AsyncSmtpTransport::<Tokio1Executor>::from_url(&config.smtp_url) {
            Ok(builder) => Some(Self {
                transport: builder.build(),
                from_address: config.from_address.clone(),
            }),
            Err(e) => {
                tracing::error!("Invalid SMTP_URL, email disabled: {:?}", e);
                None
            }
        }
    }

    /// Send a plain-text mail; errors are logged, not returned
    pub async fn send(&self, to: &str, subject: &str, body: String) {
        let message = Message::builder()
            .from(match self.from_address.parse() {
                Ok(mbox) => mbox,
                Err(e) => {
                    tracing::error!("Invalid MAIL_FROM address: {:?}", e);
                    return;
                }
            })
            .to(match to.parse() {
                Ok(mbox) => mbox,
                Err(e) => {
                    tracing::warn!("Invalid recipient address {}: {:?}", to, e);
                    return;
                }
            })
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body);

        let message = match message {
            Ok(m) => m,
            Err(e) => {
                tracing::error!("Failed to build mail: {:?}", e);
                return;
            }
        };

        if let Err(e) = self.transport.send(message).await {
            tracing::warn!("Mail delivery to {} failed: {:?}", to, e);
        }
    }
}
