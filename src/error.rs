//! Error taxonomy for a sanitization run.
//!
//! Only run-fatal conditions live here. Per-row outcomes (invalid,
//! suspicious, duplicate, opt-out) are never errors; they are folded into
//! the [`BatchReport`](crate::report::BatchReport) counters.

use crate::report::BatchReport;

#[derive(Debug, thiserror::Error)]
pub enum SanitizeError {
    /// No parsable rows after blank-line trimming. The caller must supply
    /// non-empty input; there is nothing to retry.
    #[error("input contains no data rows")]
    EmptyInput,

    /// The column mapping does not select exactly one email column. The
    /// caller returns to the mapping step; recoverable in place.
    #[error("column mapping is incomplete: {0}")]
    MissingRequiredField(String),

    /// Input bytes decode as neither UTF-8 nor Latin-1.
    #[error("input is not valid UTF-8 or Latin-1; re-save the file as UTF-8")]
    Decode,

    /// The persistence collaborator failed mid-run. Remaining chunks were
    /// aborted; already-committed chunks are not rolled back. `partial`
    /// carries the counts accumulated up to the failure.
    #[error("upstream persistence failure: {message}")]
    Upstream {
        message: String,
        partial: BatchReport,
    },
}

impl SanitizeError {
    pub fn upstream(err: impl std::fmt::Display, partial: BatchReport) -> Self {
        Self::Upstream {
            message: err.to_string(),
            partial,
        }
    }
}
