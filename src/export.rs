//! Spreadsheet-compatible exports.
//!
//! All three blobs are UTF-8 prefixed with a byte-order mark so desktop
//! spreadsheet tools pick the right encoding. Column orders are fixed and
//! part of the external contract:
//!
//! - contact export: `Nome,Email,Telefone,País,Estado,Cidade,Website,
//!   Profissão,Ramo`, comma-delimited, every field quoted;
//! - extraction export: `email;name;country;state;city;website;profession;
//!   branch`, semicolon-delimited, unquoted;
//! - opt-out export: `email,type`, comma-delimited, quoted.

use crate::contact::CanonicalContact;
use crate::store::{OptOutEntry, OptOutKind};

pub const BOM: &str = "\u{feff}";

const CONTACT_HEADERS: [&str; 9] = [
    "Nome", "Email", "Telefone", "País", "Estado", "Cidade", "Website", "Profissão", "Ramo",
];

const EXTRACTION_HEADERS: [&str; 8] = [
    "email", "name", "country", "state", "city", "website", "profession", "branch",
];

/// Full contact export for download.
pub fn export_contacts(contacts: &[CanonicalContact]) -> String {
    let mut lines = Vec::with_capacity(contacts.len() + 1);
    lines.push(CONTACT_HEADERS.join(","));
    for c in contacts {
        let fields = [
            c.name.as_deref(),
            Some(c.email.as_str()),
            c.phone.as_deref(),
            c.country.as_deref(),
            c.state.as_deref(),
            c.city.as_deref(),
            c.website.as_deref(),
            c.profession.as_deref(),
            c.branch.as_deref(),
        ];
        lines.push(
            fields
                .iter()
                .map(|f| quoted(f.unwrap_or("")))
                .collect::<Vec<_>>()
                .join(","),
        );
    }
    format!("{BOM}{}", lines.join("\n"))
}

/// Extraction-result export, re-importable by the import flow.
pub fn export_extraction(contacts: &[CanonicalContact]) -> String {
    let mut lines = Vec::with_capacity(contacts.len() + 1);
    lines.push(EXTRACTION_HEADERS.join(";"));
    for c in contacts {
        let fields = [
            Some(c.email.as_str()),
            c.name.as_deref(),
            c.country.as_deref(),
            c.state.as_deref(),
            c.city.as_deref(),
            c.website.as_deref(),
            c.profession.as_deref(),
            c.branch.as_deref(),
        ];
        lines.push(
            fields
                .iter()
                .map(|f| f.unwrap_or(""))
                .collect::<Vec<_>>()
                .join(";"),
        );
    }
    format!("{BOM}{}", lines.join("\n"))
}

/// Opt-out list export.
pub fn export_optouts(entries: &[OptOutEntry]) -> String {
    let mut lines = Vec::with_capacity(entries.len() + 1);
    lines.push("email,type".to_string());
    for e in entries {
        let kind = match e.kind {
            OptOutKind::Email => "email",
            OptOutKind::Domain => "domain",
        };
        lines.push(format!("{},{}", quoted(&e.value), quoted(kind)));
    }
    format!("{BOM}{}", lines.join("\n"))
}

fn quoted(field: &str) -> String {
    format!("\"{}\"", field)
}
