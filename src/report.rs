//! Batch outcome counters.
//!
//! One `BatchReport` is produced per pipeline run and is immutable once
//! returned to the caller. Every dropped row increments exactly one counter;
//! there is no silent drop.

use serde::{Deserialize, Serialize};

/// Why a row was dropped instead of accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    Duplicate,
    Invalid,
    Suspicious,
    OptOut,
}

/// Aggregate counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    /// Rows seen, in file order, after blank-line trimming.
    pub total: u64,
    /// Rows accepted for persistence.
    pub processed: u64,
    /// Rows the upsert collaborator reported as newly inserted.
    pub inserted: u64,
    /// Rows the upsert collaborator reported as updated in place.
    pub updated: u64,
    pub duplicates: u64,
    pub invalid: u64,
    pub opt_out: u64,
    pub suspicious: u64,
    /// Accepted rows that ended up with a usable display name.
    pub names_extracted: u64,
    /// Accepted rows where every name heuristic came up empty.
    pub names_failed: u64,
}

impl BatchReport {
    pub fn record_drop(&mut self, reason: DropReason) {
        match reason {
            DropReason::Duplicate => self.duplicates += 1,
            DropReason::Invalid => self.invalid += 1,
            DropReason::Suspicious => self.suspicious += 1,
            DropReason::OptOut => self.opt_out += 1,
        }
    }

    /// Total rows dropped for any reason.
    pub fn dropped(&self) -> u64 {
        self.duplicates + self.invalid + self.suspicious + self.opt_out
    }
}
