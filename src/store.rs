//! Boundary contracts to the hosted backend: the opt-out store and the
//! contact upsert collaborator, plus an HTTP implementation of both.
//!
//! The pipeline only ever sees the traits; tests drive it with in-memory
//! mocks.

use std::time::Duration;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::classify::{check_shape, EmailCheck};
use crate::contact::{CanonicalContact, DefaultValues};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptOutKind {
    Email,
    Domain,
}

/// One must-not-contact entry, owned by the external opt-out store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptOutEntry {
    pub value: String,
    #[serde(rename = "type")]
    pub kind: OptOutKind,
}

// A bare domain: letters/digits/dots/dashes ending in a TLD, and no '@'.
static RE_DOMAIN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid domain regex"));

/// Classify one loose opt-out value as an email or a domain entry.
/// Returns `None` for values that are neither.
pub fn classify_optout_value(raw: &str) -> Option<OptOutEntry> {
    let value = raw.trim().to_lowercase();
    if value.is_empty() {
        return None;
    }
    if check_shape(&value) != EmailCheck::Invalid {
        // Valid and suspicious shapes both suppress; a hash address on the
        // opt-out list is still a must-not-contact.
        return Some(OptOutEntry {
            value,
            kind: OptOutKind::Email,
        });
    }
    if RE_DOMAIN.is_match(&value) && !value.contains('@') {
        return Some(OptOutEntry {
            value,
            kind: OptOutKind::Domain,
        });
    }
    None
}

/// Parse a bulk opt-out list: entries separated by newlines, commas or
/// semicolons; unclassifiable values are skipped.
pub fn parse_optout_list(text: &str) -> Vec<OptOutEntry> {
    text.split(['\n', '\r', ',', ';'])
        .filter_map(classify_optout_value)
        .collect()
}

/// What the upsert collaborator reports back per chunk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertOutcome {
    pub inserted: u64,
    pub updated: u64,
}

/// Read side of the opt-out store; loaded once per run as a snapshot.
#[async_trait::async_trait]
pub trait OptOutStore: Send + Sync {
    async fn load_entries(&self) -> Result<Vec<OptOutEntry>>;
}

/// Insert-or-update collaborator, keyed by email on the backend side.
/// A chunk failure propagates as an error and aborts the remaining chunks.
#[async_trait::async_trait]
pub trait ContactStore: Send + Sync {
    async fn upsert_chunk(
        &self,
        contacts: &[CanonicalContact],
        defaults: &DefaultValues,
    ) -> Result<UpsertOutcome>;

    fn name(&self) -> &'static str;
}

pub const ENV_BACKEND_URL: &str = "CONTACT_BACKEND_URL";
pub const ENV_BACKEND_TOKEN: &str = "CONTACT_BACKEND_TOKEN";

/// HTTP JSON implementation of both stores against the hosted backend.
#[derive(Clone)]
pub struct RemoteStore {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
    timeout: Duration,
}

impl RemoteStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            client: reqwest::Client::new(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    /// Build from `CONTACT_BACKEND_URL` / `CONTACT_BACKEND_TOKEN`;
    /// `None` when no backend is configured.
    pub fn from_env() -> Option<Self> {
        let base_url = std::env::var(ENV_BACKEND_URL).ok()?;
        let mut store = Self::new(base_url);
        if let Ok(token) = std::env::var(ENV_BACKEND_TOKEN) {
            store = store.with_token(token);
        }
        Some(store)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), path);
        let mut req = self.client.request(method, url).timeout(self.timeout);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        req
    }
}

#[derive(Serialize)]
struct UpsertRequest<'a> {
    contacts: &'a [CanonicalContact],
    defaults: &'a DefaultValues,
    import_date: chrono::DateTime<chrono::Utc>,
}

#[async_trait::async_trait]
impl ContactStore for RemoteStore {
    async fn upsert_chunk(
        &self,
        contacts: &[CanonicalContact],
        defaults: &DefaultValues,
    ) -> Result<UpsertOutcome> {
        let body = UpsertRequest {
            contacts,
            defaults,
            import_date: chrono::Utc::now(),
        };
        let resp = self
            .request(reqwest::Method::POST, "contacts/upsert-batch")
            .json(&body)
            .send()
            .await
            .context("sending upsert chunk")?;
        let resp = resp.error_for_status().context("upsert chunk rejected")?;
        resp.json::<UpsertOutcome>()
            .await
            .context("decoding upsert report")
    }

    fn name(&self) -> &'static str {
        "remote-backend"
    }
}

#[async_trait::async_trait]
impl OptOutStore for RemoteStore {
    async fn load_entries(&self) -> Result<Vec<OptOutEntry>> {
        let resp = self
            .request(reqwest::Method::GET, "opt-outs")
            .send()
            .await
            .context("loading opt-out entries")?;
        let resp = resp.error_for_status().context("opt-out load rejected")?;
        resp.json::<Vec<OptOutEntry>>()
            .await
            .context("decoding opt-out entries")
    }
}
