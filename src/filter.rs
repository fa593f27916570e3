//! Dedup & suppression filter.
//!
//! Consumes prospective contacts in file order and folds them through an
//! explicit accumulator: duplicate check, shape check, opt-out check,
//! then accept (derive name/website, backfill defaults). First occurrence
//! of an email wins; later duplicates are counted as duplicates even when
//! they carry more complete data. Pure with respect to its inputs (no
//! I/O, no hidden state), so chunk boundaries upstream can never change
//! the outcome.

use std::collections::HashSet;

use tracing::debug;

use crate::classify::{self, anon_hash, EmailCheck, ReferenceData, NAME_UNKNOWN};
use crate::contact::{CanonicalContact, DefaultValues};
use crate::report::{BatchReport, DropReason};
use crate::store::{OptOutEntry, OptOutKind};

/// Opt-out snapshot partitioned for O(1) membership checks.
#[derive(Debug, Clone, Default)]
pub struct OptOutSets {
    emails: HashSet<String>,
    domains: HashSet<String>,
}

impl OptOutSets {
    pub fn from_entries(entries: Vec<OptOutEntry>) -> Self {
        let mut sets = Self::default();
        for e in entries {
            let value = e.value.trim().to_lowercase();
            if value.is_empty() {
                continue;
            }
            match e.kind {
                OptOutKind::Email => sets.emails.insert(value),
                OptOutKind::Domain => sets.domains.insert(value),
            };
        }
        sets
    }

    pub fn len(&self) -> usize {
        self.emails.len() + self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty() && self.domains.is_empty()
    }

    /// Exact email match, or the address's domain is opted out.
    pub fn suppresses(&self, email_lower: &str) -> bool {
        if self.emails.contains(email_lower) {
            return true;
        }
        match email_lower.split_once('@') {
            Some((_, domain)) => self.domains.contains(domain),
            None => false,
        }
    }
}

/// Accumulator threaded through the fold; one per batch, never shared.
#[derive(Debug, Default)]
pub struct SanitizeState {
    seen: HashSet<String>,
    accepted: Vec<CanonicalContact>,
    pub report: BatchReport,
}

impl SanitizeState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_outcome(self) -> SanitizeOutcome {
        SanitizeOutcome {
            accepted: self.accepted,
            report: self.report,
        }
    }
}

#[derive(Debug)]
pub struct SanitizeOutcome {
    pub accepted: Vec<CanonicalContact>,
    pub report: BatchReport,
}

/// One fold step. Order is the contract: duplicate, then validity, then
/// suppression, then accept.
pub fn sanitize_one(
    mut state: SanitizeState,
    mut candidate: CanonicalContact,
    optout: &OptOutSets,
    defaults: &DefaultValues,
    reference: &ReferenceData,
) -> SanitizeState {
    state.report.total += 1;
    let email = candidate.email.trim().to_lowercase();

    if state.seen.contains(&email) {
        state.report.record_drop(DropReason::Duplicate);
        return state;
    }

    match classify::check_shape(&email) {
        EmailCheck::Invalid => {
            state.report.record_drop(DropReason::Invalid);
            return state;
        }
        EmailCheck::Suspicious => {
            debug!(id = %anon_hash(&email), "dropping hash-like address");
            state.report.record_drop(DropReason::Suspicious);
            return state;
        }
        EmailCheck::Valid => {}
    }

    if optout.suppresses(&email) {
        state.report.record_drop(DropReason::OptOut);
        return state;
    }

    // Accept: derived fields fill the gaps the mapping left, defaults fill
    // what is still empty after that.
    let derived = classify::classify_and_extract(&email, reference);
    candidate.email = email.clone();
    if candidate.name.is_none() && derived.name != NAME_UNKNOWN {
        candidate.name = Some(derived.name);
    }
    if candidate.website.is_none() {
        candidate.website = derived.website;
    }
    defaults.backfill(&mut candidate);

    if candidate.name.is_some() {
        state.report.names_extracted += 1;
    } else {
        state.report.names_failed += 1;
    }
    state.report.processed += 1;
    state.seen.insert(email);
    state.accepted.push(candidate);
    state
}

/// Fold a whole candidate sequence. Callers that need chunking drive
/// `sanitize_one` themselves and keep the state between chunks.
pub fn sanitize_batch(
    candidates: impl IntoIterator<Item = CanonicalContact>,
    optout: &OptOutSets,
    defaults: &DefaultValues,
    reference: &ReferenceData,
) -> SanitizeOutcome {
    candidates
        .into_iter()
        .fold(SanitizeState::new(), |state, candidate| {
            sanitize_one(state, candidate, optout, defaults, reference)
        })
        .into_outcome()
}
