//! Pipeline orchestration: chunked runs over parsed input, progress
//! observation, opt-out snapshot loading, and bounded upsert delivery.
//!
//! The pure stages (parse → map → classify → dedup) stay synchronous; the
//! orchestration yields cooperatively between chunks so a host stays
//! responsive. Chunk boundaries never affect the outcome: the filter
//! state accumulates across chunks in one explicit value.

use metrics::{counter, gauge};
use tracing::{info, warn};

use crate::classify::ReferenceData;
use crate::config::SanitizerConfig;
use crate::contact::{CanonicalContact, DefaultValues};
use crate::error::SanitizeError;
use crate::filter::{sanitize_one, OptOutSets, SanitizeOutcome, SanitizeState};
use crate::mapping::{contact_from_row, ColumnMapping};
use crate::metrics::describe_pipeline_metrics;
use crate::parse::{split_lines, ParsedSheet, DELIMITER};
use crate::report::BatchReport;
use crate::store::{ContactStore, OptOutStore};

/// Monotonically increasing `{processed, total}` pair, emitted after each
/// chunk. Purely observational.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Progress {
    pub processed: u64,
    pub total: u64,
}

/// One import run: parsed sheet + user-adjusted mapping + defaults.
#[derive(Debug, Clone)]
pub struct ImportRequest {
    pub sheet: ParsedSheet,
    pub mapping: ColumnMapping,
    pub defaults: DefaultValues,
}

/// Output of the extraction flow: sanitized records ready for export or
/// delivery, plus the run counters.
#[derive(Debug)]
pub struct ExtractionOutcome {
    pub contacts: Vec<CanonicalContact>,
    pub report: BatchReport,
}

/// Full import: verify the mapping, snapshot opt-outs, sanitize in chunks,
/// then deliver accepted records in bounded upsert chunks.
///
/// Progress counts input rows disposed of: dropped rows immediately,
/// accepted rows once their upsert chunk lands.
pub async fn run_import<F>(
    req: &ImportRequest,
    contact_store: &dyn ContactStore,
    optout_store: &dyn OptOutStore,
    cfg: &SanitizerConfig,
    reference: &ReferenceData,
    mut progress: F,
) -> Result<BatchReport, SanitizeError>
where
    F: FnMut(Progress),
{
    describe_pipeline_metrics();
    req.mapping.require_single_email()?;

    let optout = load_optout_snapshot(optout_store).await?;
    let total_rows = req.sheet.rows.len() as u64;
    info!(
        rows = total_rows,
        optout_entries = optout.len(),
        "import run starting"
    );

    // Sanitize in chunks; the accumulator value carries across chunks.
    let mut state = SanitizeState::new();
    for chunk in req.sheet.rows.chunks(cfg.process_chunk_size.max(1)) {
        for row in chunk {
            let candidate = contact_from_row(&req.sheet, row, &req.mapping);
            state = sanitize_one(state, candidate, &optout, &req.defaults, reference);
        }
        progress(Progress {
            processed: state.report.dropped(),
            total: total_rows,
        });
        tokio::task::yield_now().await;
    }

    let SanitizeOutcome {
        accepted,
        mut report,
    } = state.into_outcome();
    record_filter_metrics(&report);

    upsert_in_chunks(
        &accepted,
        contact_store,
        &req.defaults,
        cfg.upsert_chunk_size,
        &mut report,
        total_rows,
        &mut progress,
    )
    .await?;

    gauge!("pipeline_last_run_ts").set(chrono::Utc::now().timestamp() as f64);
    info!(
        accepted = report.processed,
        inserted = report.inserted,
        updated = report.updated,
        dropped = report.dropped(),
        "import run finished"
    );
    Ok(report)
}

/// Headerless extraction flow: fixed positional columns
/// (`email;country;state;city;profession;branch`), dedup and name
/// derivation per line, no suppression (opt-outs apply at delivery time).
///
/// Progress counts input lines scanned.
pub async fn run_extraction<F>(
    text: &str,
    defaults: &DefaultValues,
    cfg: &SanitizerConfig,
    reference: &ReferenceData,
    mut progress: F,
) -> Result<ExtractionOutcome, SanitizeError>
where
    F: FnMut(Progress),
{
    let lines = split_lines(text);
    if lines.is_empty() {
        return Err(SanitizeError::EmptyInput);
    }
    let total = lines.len() as u64;

    let mut state = SanitizeState::new();
    let optout = OptOutSets::default();
    let mut scanned = 0u64;
    for chunk in lines.chunks(cfg.process_chunk_size.max(1)) {
        for line in chunk {
            state = sanitize_one(
                state,
                candidate_from_positional_line(line),
                &optout,
                defaults,
                reference,
            );
        }
        scanned += chunk.len() as u64;
        progress(Progress {
            processed: scanned,
            total,
        });
        tokio::task::yield_now().await;
    }

    let SanitizeOutcome { accepted, report } = state.into_outcome();
    record_filter_metrics(&report);
    info!(
        lines = total,
        unique = report.processed,
        named = report.names_extracted,
        "extraction run finished"
    );
    Ok(ExtractionOutcome {
        contacts: accepted,
        report,
    })
}

/// Deliver already-sanitized records (e.g. an extraction result the user
/// reviewed): snapshot opt-outs, suppress matches, upsert the rest in
/// bounded chunks.
pub async fn deliver_contacts<F>(
    contacts: Vec<CanonicalContact>,
    contact_store: &dyn ContactStore,
    optout_store: &dyn OptOutStore,
    defaults: &DefaultValues,
    cfg: &SanitizerConfig,
    mut progress: F,
) -> Result<BatchReport, SanitizeError>
where
    F: FnMut(Progress),
{
    describe_pipeline_metrics();
    if contacts.is_empty() {
        return Ok(BatchReport::default());
    }

    let optout = load_optout_snapshot(optout_store).await?;
    let total = contacts.len() as u64;
    let mut report = BatchReport {
        total,
        ..Default::default()
    };

    let mut kept = Vec::with_capacity(contacts.len());
    for mut contact in contacts {
        contact.email = contact.email.trim().to_lowercase();
        if optout.suppresses(&contact.email) {
            report.opt_out += 1;
        } else {
            kept.push(contact);
        }
    }
    report.processed = kept.len() as u64;
    counter!("sanitize_optout_total").increment(report.opt_out);

    upsert_in_chunks(
        &kept,
        contact_store,
        defaults,
        cfg.upsert_chunk_size,
        &mut report,
        total,
        &mut progress,
    )
    .await?;

    gauge!("pipeline_last_run_ts").set(chrono::Utc::now().timestamp() as f64);
    Ok(report)
}

async fn load_optout_snapshot(store: &dyn OptOutStore) -> Result<OptOutSets, SanitizeError> {
    let entries = store
        .load_entries()
        .await
        .map_err(|e| SanitizeError::upstream(format!("loading opt-outs: {e:#}"), BatchReport::default()))?;
    Ok(OptOutSets::from_entries(entries))
}

/// Bounded-size delivery. A chunk failure aborts the remainder and
/// surfaces the partial report; committed chunks stay committed.
async fn upsert_in_chunks<F>(
    accepted: &[CanonicalContact],
    store: &dyn ContactStore,
    defaults: &DefaultValues,
    chunk_size: usize,
    report: &mut BatchReport,
    total_rows: u64,
    progress: &mut F,
) -> Result<(), SanitizeError>
where
    F: FnMut(Progress),
{
    let mut delivered = 0u64;
    for chunk in accepted.chunks(chunk_size.max(1)) {
        match store.upsert_chunk(chunk, defaults).await {
            Ok(outcome) => {
                report.inserted += outcome.inserted;
                report.updated += outcome.updated;
                delivered += chunk.len() as u64;
                counter!("upsert_inserted_total").increment(outcome.inserted);
                counter!("upsert_updated_total").increment(outcome.updated);
                progress(Progress {
                    processed: report.dropped() + delivered,
                    total: total_rows,
                });
            }
            Err(e) => {
                counter!("upsert_chunk_errors_total").increment(1);
                warn!(store = store.name(), error = %format!("{e:#}"), "upsert chunk failed; aborting run");
                return Err(SanitizeError::upstream(format!("{e:#}"), *report));
            }
        }
        tokio::task::yield_now().await;
    }
    Ok(())
}

fn candidate_from_positional_line(line: &str) -> CanonicalContact {
    fn non_empty(v: Option<&str>) -> Option<String> {
        v.filter(|s| !s.is_empty()).map(str::to_string)
    }

    let mut parts = line.split(DELIMITER).map(str::trim);
    let mut contact = CanonicalContact::new(parts.next().unwrap_or(""));
    contact.country = non_empty(parts.next());
    contact.state = non_empty(parts.next());
    contact.city = non_empty(parts.next());
    contact.profession = non_empty(parts.next());
    contact.branch = non_empty(parts.next());
    contact
}

fn record_filter_metrics(report: &BatchReport) {
    counter!("sanitize_rows_total").increment(report.total);
    counter!("sanitize_accepted_total").increment(report.processed);
    counter!("sanitize_duplicates_total").increment(report.duplicates);
    counter!("sanitize_invalid_total").increment(report.invalid);
    counter!("sanitize_suspicious_total").increment(report.suspicious);
    counter!("sanitize_optout_total").increment(report.opt_out);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_line_fills_fixed_columns() {
        let c = candidate_from_positional_line("a@b.com;Brasil;;SP;;Tecnologia");
        assert_eq!(c.email, "a@b.com");
        assert_eq!(c.country.as_deref(), Some("Brasil"));
        assert_eq!(c.state, None);
        assert_eq!(c.city.as_deref(), Some("SP"));
        assert_eq!(c.profession, None);
        assert_eq!(c.branch.as_deref(), Some("Tecnologia"));
    }

    #[test]
    fn positional_line_tolerates_missing_trailing_columns() {
        let c = candidate_from_positional_line("a@b.com");
        assert_eq!(c.email, "a@b.com");
        assert_eq!(c.country, None);
        assert_eq!(c.branch, None);
    }
}
