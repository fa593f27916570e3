//! Domain classification: generic webmail vs. corporate.

use super::reference::ReferenceData;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainKind {
    /// Public webmail provider (gmail.com, hotmail.com, ...).
    Generic,
    /// A private organization's own domain.
    Corporate,
}

pub fn classify_domain(domain: &str, reference: &ReferenceData) -> DomainKind {
    if reference.is_generic_domain(domain) {
        DomainKind::Generic
    } else {
        DomainKind::Corporate
    }
}

/// Corporate domains double as the contact's website; webmail domains
/// carry no such signal.
pub fn website_for(domain: &str, kind: DomainKind) -> Option<String> {
    match kind {
        DomainKind::Generic => None,
        DomainKind::Corporate => Some(format!("https://{domain}")),
    }
}
