//! Webhook delivery for import-completion events, with bounded retries.

use std::time::Duration;

use anyhow::{anyhow, Result};
use reqwest::Client;

use super::NotificationEvent;

pub const ENV_WEBHOOK_URL: &str = "SANITIZER_WEBHOOK_URL";

#[derive(Clone)]
pub struct WebhookNotifier {
    url: String,
    client: Client,
    timeout: Duration,
    max_retries: u8,
}

impl WebhookNotifier {
    pub fn new(url: String) -> Self {
        Self {
            url,
            client: Client::new(),
            timeout: Duration::from_secs(5),
            max_retries: 3,
        }
    }

    pub fn from_env() -> Option<Self> {
        std::env::var(ENV_WEBHOOK_URL).ok().map(Self::new)
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    pub fn with_retries(mut self, retries: u8) -> Self {
        self.max_retries = retries;
        self
    }

    pub async fn send_event(&self, ev: &NotificationEvent) -> Result<()> {
        let mut attempt: u8 = 0;
        loop {
            attempt += 1;
            let res = self
                .client
                .post(&self.url)
                .timeout(self.timeout)
                .json(ev)
                .send()
                .await;

            match res {
                Ok(rsp) => {
                    if let Err(e) = rsp.error_for_status_ref() {
                        if attempt < self.max_retries {
                            backoff(attempt).await;
                            continue;
                        }
                        return Err(anyhow!("webhook HTTP error: {e}"));
                    }
                    return Ok(());
                }
                Err(e) => {
                    if attempt < self.max_retries {
                        backoff(attempt).await;
                        continue;
                    }
                    return Err(anyhow!("webhook request failed: {e}"));
                }
            }
        }
    }
}

async fn backoff(attempt: u8) {
    tokio::time::sleep(Duration::from_millis(500u64 << (attempt - 1))).await;
}
