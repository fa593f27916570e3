//! Canonical contact record and configurable default values.

use serde::{Deserialize, Serialize};

/// The per-row output record of the pipeline. `email` is always present and
/// lower-cased by the time a record is accepted; every other field is
/// optional. Terminal state is either "emitted for persistence" or "dropped"
/// (invalid / duplicate / opted-out), never both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalContact {
    pub email: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub website: Option<String>,
    pub profession: Option<String>,
    pub branch: Option<String>,
}

impl CanonicalContact {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Default::default()
        }
    }

    /// Domain part of the email, if the address has one.
    pub fn domain(&self) -> Option<&str> {
        self.email.split_once('@').map(|(_, d)| d)
    }
}

/// Values backfilled into fields that are still empty after mapping.
/// An explicit value from the source is never overwritten.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultValues {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub profession: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
}

impl DefaultValues {
    pub fn is_empty(&self) -> bool {
        self.country.is_none() && self.profession.is_none() && self.branch.is_none()
    }

    /// Fill empty fields only.
    pub fn backfill(&self, contact: &mut CanonicalContact) {
        if contact.country.is_none() {
            contact.country = self.country.clone();
        }
        if contact.profession.is_none() {
            contact.profession = self.profession.clone();
        }
        if contact.branch.is_none() {
            contact.branch = self.branch.clone();
        }
    }
}
