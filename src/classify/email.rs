//! Email shape validation and the suspicious-address heuristic.

use once_cell::sync::Lazy;
use regex::Regex;

/// Addresses longer than this are rejected outright.
pub const MAX_EMAIL_LEN: usize = 100;

static RE_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email shape regex"));

// 32+ hex chars as the whole local part: almost certainly an MD5/hash
// handle, not a person.
static RE_HEX_LOCAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[a-f0-9]{32,}$").expect("valid hex-local regex"));

/// Outcome of the shape check. `Suspicious` is a classification, not an
/// error: the row is dropped and counted separately from plain `Invalid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailCheck {
    Valid,
    Invalid,
    Suspicious,
}

pub fn check_shape(email: &str) -> EmailCheck {
    if email.is_empty() || email.chars().count() > MAX_EMAIL_LEN {
        return EmailCheck::Invalid;
    }
    if !RE_SHAPE.is_match(email) {
        return EmailCheck::Invalid;
    }
    let local = email.split('@').next().unwrap_or("");
    if RE_HEX_LOCAL.is_match(local) {
        return EmailCheck::Suspicious;
    }
    EmailCheck::Valid
}

/// Short anonymized handle for log lines; raw addresses are never logged.
pub fn anon_hash(email: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(email.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}
