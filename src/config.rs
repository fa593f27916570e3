//! Runtime configuration: chunk sizes, default values, reference-data
//! overrides.
//!
//! Load order: `$SANITIZER_CONFIG_PATH`, then `config/sanitizer.toml`,
//! then compiled defaults. Chunk sizes can additionally be overridden per
//! environment variable, which wins over the file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::classify::ReferenceData;
use crate::contact::DefaultValues;

pub const DEFAULT_CONFIG_PATH: &str = "config/sanitizer.toml";

pub const ENV_CONFIG_PATH: &str = "SANITIZER_CONFIG_PATH";
pub const ENV_PROCESS_CHUNK_SIZE: &str = "SANITIZER_PROCESS_CHUNK_SIZE";
pub const ENV_UPSERT_CHUNK_SIZE: &str = "SANITIZER_UPSERT_CHUNK_SIZE";

#[derive(Debug, Clone, Deserialize)]
pub struct SanitizerConfig {
    /// Rows folded between cooperative yields.
    #[serde(default = "default_process_chunk_size")]
    pub process_chunk_size: usize,
    /// Records per upsert request; bounded by backend payload limits.
    #[serde(default = "default_upsert_chunk_size")]
    pub upsert_chunk_size: usize,
    /// Backfill values applied to empty fields.
    #[serde(default)]
    pub defaults: DefaultValues,
    /// Optional replacement for the compiled-in first-name list.
    #[serde(default)]
    pub common_names_path: Option<PathBuf>,
    /// Optional replacement for the compiled-in webmail-domain list.
    #[serde(default)]
    pub generic_domains_path: Option<PathBuf>,
}

fn default_process_chunk_size() -> usize {
    100
}

fn default_upsert_chunk_size() -> usize {
    500
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        Self {
            process_chunk_size: default_process_chunk_size(),
            upsert_chunk_size: default_upsert_chunk_size(),
            defaults: DefaultValues::default(),
            common_names_path: None,
            generic_domains_path: None,
        }
    }
}

impl SanitizerConfig {
    pub fn load_from(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        let mut cfg: Self = toml::from_str(&raw)
            .with_context(|| format!("parsing config from {}", path.display()))?;
        cfg.apply_env_overrides();
        Ok(cfg)
    }

    /// Env path → default path → compiled defaults.
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            return Self::load_from(&PathBuf::from(p));
        }
        let fallback = PathBuf::from(DEFAULT_CONFIG_PATH);
        if fallback.exists() {
            return Self::load_from(&fallback);
        }
        let mut cfg = Self::default();
        cfg.apply_env_overrides();
        Ok(cfg)
    }

    fn apply_env_overrides(&mut self) {
        if let Some(n) = parse_size_env(ENV_PROCESS_CHUNK_SIZE) {
            self.process_chunk_size = n;
        }
        if let Some(n) = parse_size_env(ENV_UPSERT_CHUNK_SIZE) {
            self.upsert_chunk_size = n;
        }
    }

    /// Reference data per this config: file overrides where given,
    /// builtin lists otherwise.
    pub fn reference_data(&self) -> Result<ReferenceData> {
        ReferenceData::from_files(
            self.common_names_path.as_deref(),
            self.generic_domains_path.as_deref(),
        )
    }
}

fn parse_size_env(name: &str) -> Option<usize> {
    std::env::var(name)
        .ok()
        .and_then(|s| s.trim().parse::<usize>().ok())
        .filter(|n| *n > 0)
}
