//! Reference data for the classifier: common first names and generic
//! (webmail) domains.
//!
//! The compiled-in lists live at the crate root (`common_names.json`,
//! `generic_domains.json`) and are loaded once. Everything that consumes
//! them takes a `&ReferenceData` argument, so tests and other locales can
//! inject their own lists instead of reaching for the ambient default.

use std::path::Path;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;

static BUILTIN: Lazy<ReferenceData> = Lazy::new(|| {
    let names: Vec<String> = serde_json::from_str(include_str!("../../common_names.json"))
        .expect("valid common-name list");
    let domains: Vec<String> = serde_json::from_str(include_str!("../../generic_domains.json"))
        .expect("valid generic-domain list");
    ReferenceData::new(names, domains)
});

#[derive(Debug, Clone)]
pub struct ReferenceData {
    common_names: Vec<String>,
    generic_domains: Vec<String>,
}

impl ReferenceData {
    /// Compiled-in default lists (pt-BR weighted names, global webmail
    /// providers).
    pub fn builtin() -> &'static ReferenceData {
        &BUILTIN
    }

    /// Entries are normalized to lower-case; blanks are dropped.
    pub fn new(common_names: Vec<String>, generic_domains: Vec<String>) -> Self {
        Self {
            common_names: clean(common_names),
            generic_domains: clean(generic_domains),
        }
    }

    /// Load either list from a JSON array file, falling back to the
    /// builtin list where no path is given.
    pub fn from_files(names: Option<&Path>, domains: Option<&Path>) -> Result<Self> {
        let common_names = match names {
            Some(p) => load_list(p)?,
            None => BUILTIN.common_names.clone(),
        };
        let generic_domains = match domains {
            Some(p) => load_list(p)?,
            None => BUILTIN.generic_domains.clone(),
        };
        Ok(Self::new(common_names, generic_domains))
    }

    /// The known first name `candidate` starts with, if any.
    pub fn first_name_prefix(&self, candidate: &str) -> Option<&str> {
        self.common_names
            .iter()
            .find(|n| candidate.starts_with(n.as_str()))
            .map(String::as_str)
    }

    /// Suffix match so country variants (`yahoo.com.br`) ride on their
    /// base entries.
    pub fn is_generic_domain(&self, domain: &str) -> bool {
        self.generic_domains.iter().any(|d| domain.ends_with(d))
    }
}

fn load_list(path: &Path) -> Result<Vec<String>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading reference list from {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("parsing reference list from {}", path.display()))
}

fn clean(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}
