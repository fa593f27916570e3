//! Email classifier & name extractor.
//!
//! `classify_and_extract` is the one entry point: shape validation, domain
//! classification, website derivation, and the name cascade, in that
//! order. It is total: every path returns a value and nothing here can
//! panic, because a single odd address must never take down a batch.

pub mod domain;
pub mod email;
pub mod name;
pub mod reference;

pub use domain::{classify_domain, website_for, DomainKind};
pub use email::{anon_hash, check_shape, EmailCheck, MAX_EMAIL_LEN};
pub use reference::ReferenceData;

/// Sentinel rendered when no name heuristic produced anything usable.
pub const NAME_UNKNOWN: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Extraction {
    pub check: EmailCheck,
    /// Derived display name, or [`NAME_UNKNOWN`].
    pub name: String,
    /// `https://<domain>` for corporate domains, `None` for webmail.
    pub website: Option<String>,
}

impl Extraction {
    fn unknown(check: EmailCheck) -> Self {
        Self {
            check,
            name: NAME_UNKNOWN.to_string(),
            website: None,
        }
    }
}

/// Classify one address and derive `{name, website}` from it.
///
/// Invalid and suspicious addresses get the sentinel name and no website;
/// a hash-looking local part must never be dressed up as a person.
pub fn classify_and_extract(email: &str, reference: &ReferenceData) -> Extraction {
    let check = check_shape(email);
    if check != EmailCheck::Valid {
        return Extraction::unknown(check);
    }

    let lowered = email.to_lowercase();
    let Some((local, domain)) = lowered.split_once('@') else {
        // Unreachable past the shape check; bail to the sentinel anyway.
        return Extraction::unknown(EmailCheck::Invalid);
    };

    let kind = classify_domain(domain, reference);
    let website = website_for(domain, kind);

    let clean_local: String = local.chars().filter(|c| !c.is_ascii_digit()).collect();
    let ctx = name::NameContext {
        clean_local: &clean_local,
        domain,
        generic_domain: kind == DomainKind::Generic,
        reference,
    };
    let name = name::derive_name(&ctx).unwrap_or_else(|| NAME_UNKNOWN.to_string());

    Extraction {
        check: EmailCheck::Valid,
        name,
        website,
    }
}
