//! Import-completion notifications.
//!
//! After a pipeline run the host broadcasts an `import_completion` event to
//! whoever is configured to hear it: a webhook, an SMTP recipient, or both.
//! Delivery is best-effort: a failed notification is logged and never
//! fails the run that produced it.

pub mod email;
pub mod webhook;

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::report::BatchReport;

#[derive(Debug, Clone, serde::Serialize)]
pub struct NotificationEvent {
    pub success: bool,
    pub report: BatchReport,
    /// Present when the run aborted; mirrors the upstream error message.
    pub error: Option<String>,
    pub ts: DateTime<Utc>,
}

impl NotificationEvent {
    pub fn completed(report: BatchReport) -> Self {
        Self {
            success: true,
            report,
            error: None,
            ts: Utc::now(),
        }
    }

    pub fn failed(report: BatchReport, error: impl Into<String>) -> Self {
        Self {
            success: false,
            report,
            error: Some(error.into()),
            ts: Utc::now(),
        }
    }
}

/// Fan-out over every configured sender.
#[derive(Default)]
pub struct NotifierMux {
    webhook: Option<webhook::WebhookNotifier>,
    email: Option<email::EmailSender>,
}

impl NotifierMux {
    /// Build from the environment; senders without configuration are
    /// simply absent and the mux degrades to a no-op.
    pub fn from_env() -> Self {
        Self {
            webhook: webhook::WebhookNotifier::from_env(),
            email: email::EmailSender::from_env(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.webhook.is_none() && self.email.is_none()
    }

    pub async fn send_event(&self, ev: &NotificationEvent) {
        if let Some(webhook) = &self.webhook {
            if let Err(e) = webhook.send_event(ev).await {
                warn!(error = %format!("{e:#}"), "webhook notification failed");
            }
        }
        if let Some(email) = &self.email {
            if let Err(e) = email.send_event(ev).await {
                warn!(error = %format!("{e:#}"), "email notification failed");
            }
        }
    }
}
