//! SMTP delivery for import-completion events.

use anyhow::{Context, Result};
use lettre::message::{header, Mailbox, Message};
use lettre::transport::smtp::{authentication::Credentials, AsyncSmtpTransport};
use lettre::{AsyncTransport, Tokio1Executor};

use super::NotificationEvent;

pub struct EmailSender {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl EmailSender {
    /// `None` unless the full SMTP configuration is present.
    pub fn from_env() -> Option<Self> {
        let host = std::env::var("SMTP_HOST").ok()?;
        let user = std::env::var("SMTP_USER").ok()?;
        let pass = std::env::var("SMTP_PASS").ok()?;
        let from_addr = std::env::var("NOTIFY_EMAIL_FROM").ok()?;
        let to_addr = std::env::var("NOTIFY_EMAIL_TO").ok()?;

        let creds = Credentials::new(user, pass);
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&host)
            .ok()?
            .credentials(creds)
            .build();

        let from = from_addr.parse().ok()?;
        let to = to_addr.parse().ok()?;

        Some(Self { mailer, from, to })
    }

    pub async fn send_event(&self, ev: &NotificationEvent) -> Result<()> {
        let subject = if ev.success {
            format!(
                "Import finished: {} inserted, {} updated",
                ev.report.inserted, ev.report.updated
            )
        } else {
            "Import failed".to_string()
        };
        let body = format!(
            "Total rows: {}\nAccepted: {}\nInserted: {}\nUpdated: {}\nDuplicates: {}\nInvalid: {}\nSuspicious: {}\nOpt-out: {}\nError: {}\nTimestamp: {}\n",
            ev.report.total,
            ev.report.processed,
            ev.report.inserted,
            ev.report.updated,
            ev.report.duplicates,
            ev.report.invalid,
            ev.report.suspicious,
            ev.report.opt_out,
            ev.error.as_deref().unwrap_or("-"),
            ev.ts.to_rfc3339()
        );

        let msg = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(subject)
            .header(header::ContentType::TEXT_PLAIN)
            .body(body)
            .context("build email")?;

        self.mailer.send(msg).await.context("send email")?;
        Ok(())
    }
}
