// src/mailer.rs
//! SMTP delivery of the daily report

use anyhow::{anyhow, Context, Result};
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::config::EmailConfig;
use crate::fs_ops::FsOps;

const SMTP_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "lowercase")]
pub enum MailOutcome {
    Sent,
    /// No usable password configured
    Skipped,
    Failed(String),
}

impl MailOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, MailOutcome::Sent)
    }
}

/// Rendered report ready to be mailed
pub struct MailContent<'a> {
    pub subject: &'a str,
    pub text: &'a str,
    pub html: &'a str,
    pub attachment: Option<&'a Path>,
}

pub struct Mailer {
    config: EmailConfig,
}

impl Mailer {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Send the report. Never fails the run: problems come back as an outcome.
    pub async fn send_report(&self, content: &MailContent<'_>) -> MailOutcome {
        if !self.config.has_credentials() {
            warn!("Email password not configured, skipping email sending");
            return MailOutcome::Skipped;
        }

        match self.try_send(content).await {
            Ok(()) => {
                info!("Email report sent to {}", self.config.recipient_email);
                MailOutcome::Sent
            }
            Err(e) => {
                error!("Error sending email: {:#}", e);
                MailOutcome::Failed(format!("{:#}", e))
            }
        }
    }

    async fn try_send(&self, content: &MailContent<'_>) -> Result<()> {
        let attachment = match content.attachment.filter(|p| p.exists()) {
            Some(path) => {
                let bytes = tokio::fs::read(path)
                    .await
                    .with_context(|| format!("Failed to read attachment: {}", path.display()))?;
                Some((FsOps::file_name(path), bytes))
            }
            None => None,
        };

        let message = self.build_message(content, attachment)?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_server)
            .with_context(|| format!("Invalid SMTP relay: {}", self.config.smtp_server))?
            .port(self.config.smtp_port)
            .credentials(Credentials::new(
                self.config.sender_email.clone(),
                self.config.sender_password.clone(),
            ))
            .timeout(Some(SMTP_TIMEOUT))
            .build();

        transport
            .send(message)
            .await
            .context("SMTP delivery failed")?;
        Ok(())
    }

    /// multipart/mixed with a text+HTML alternative and the optional ZIP
    pub fn build_message(
        &self,
        content: &MailContent<'_>,
        attachment: Option<(String, Vec<u8>)>,
    ) -> Result<Message> {
        let from: Mailbox = self
            .config
            .sender_email
            .parse()
            .with_context(|| format!("Invalid sender address: {}", self.config.sender_email))?;
        let to: Mailbox = self
            .config
            .recipient_email
            .parse()
            .with_context(|| format!("Invalid recipient address: {}", self.config.recipient_email))?;

        let mut body = MultiPart::mixed().multipart(MultiPart::alternative_plain_html(
            content.text.to_string(),
            content.html.to_string(),
        ));

        if let Some((name, bytes)) = attachment {
            let zip_type = ContentType::parse("application/zip")
                .map_err(|e| anyhow!("Invalid attachment content type: {}", e))?;
            body = body.singlepart(Attachment::new(name).body(bytes, zip_type));
        }

        Message::builder()
            .from(from)
            .to(to)
            .subject(content.subject)
            .multipart(body)
            .context("Failed to build email message")
    }
}
