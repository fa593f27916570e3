//! Column mapper: source headers → canonical contact fields.
//!
//! The default mapping is advisory, a heuristic the caller (UI) may
//! override per header. The only hard precondition, checked before
//! extraction proceeds, is that exactly one header maps to `email`.

use std::collections::HashMap;

use crate::contact::CanonicalContact;
use crate::error::SanitizeError;
use crate::parse::{ParsedSheet, RawRow};

/// Canonical contact fields a source column can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Email,
    Name,
    Phone,
    Country,
    State,
    City,
    Website,
    Profession,
    Branch,
}

impl Field {
    /// Match order matters: first key found as a substring of the header
    /// wins.
    pub const ALL: [Field; 9] = [
        Field::Email,
        Field::Name,
        Field::Phone,
        Field::Country,
        Field::State,
        Field::City,
        Field::Website,
        Field::Profession,
        Field::Branch,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Field::Email => "email",
            Field::Name => "name",
            Field::Phone => "phone",
            Field::Country => "country",
            Field::State => "state",
            Field::City => "city",
            Field::Website => "website",
            Field::Profession => "profession",
            Field::Branch => "branch",
        }
    }

    /// Display label as the product ships it (pt-BR).
    pub fn label(self) -> &'static str {
        match self {
            Field::Email => "E-mail",
            Field::Name => "Nome",
            Field::Phone => "Telefone",
            Field::Country => "País",
            Field::State => "Estado",
            Field::City => "Cidade",
            Field::Website => "Website",
            Field::Profession => "Profissão",
            Field::Branch => "Ramo",
        }
    }

    pub fn from_key(key: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.key() == key)
    }
}

/// Similarity floor for the fuzzy fallback; high enough that only
/// near-spellings ("e-mail", "emial") map, never unrelated headers.
const FUZZY_HEADER_THRESHOLD: f64 = 0.92;

/// Header → field assignment, positional and parallel to the sheet headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMapping {
    slots: Vec<Option<Field>>,
}

impl ColumnMapping {
    /// Heuristic default: lower-case each header and take the first
    /// canonical key it contains as a substring. Headers nothing matches
    /// get a second chance through Jaro-Winkler similarity against the
    /// keys, then stay unmapped.
    pub fn suggest(headers: &[String]) -> Self {
        let slots = headers
            .iter()
            .map(|header| {
                let needle = header.trim().to_lowercase();
                Field::ALL
                    .into_iter()
                    .find(|f| needle.contains(f.key()))
                    .or_else(|| fuzzy_match(&needle))
            })
            .collect();
        Self { slots }
    }

    /// Build from explicit `{header: field-key}` pairs, e.g. a mapping the
    /// user adjusted in the UI. Unknown keys and unlisted headers stay
    /// unmapped.
    pub fn from_pairs(headers: &[String], pairs: &HashMap<String, String>) -> Self {
        let slots = headers
            .iter()
            .map(|h| pairs.get(h).and_then(|k| Field::from_key(k)))
            .collect();
        Self { slots }
    }

    pub fn slots(&self) -> &[Option<Field>] {
        &self.slots
    }

    pub fn set(&mut self, index: usize, field: Option<Field>) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = field;
        }
    }

    /// Column index mapped to email, when there is exactly one.
    ///
    /// Zero email columns means the batch cannot be keyed; more than one
    /// is ambiguous; both send the caller back to the mapping step.
    pub fn require_single_email(&self) -> Result<usize, SanitizeError> {
        let mut found = self
            .slots
            .iter()
            .enumerate()
            .filter(|(_, f)| **f == Some(Field::Email))
            .map(|(i, _)| i);

        match (found.next(), found.next()) {
            (Some(idx), None) => Ok(idx),
            (None, _) => Err(SanitizeError::MissingRequiredField(
                "no column is mapped to email".into(),
            )),
            (Some(_), Some(_)) => Err(SanitizeError::MissingRequiredField(
                "more than one column is mapped to email".into(),
            )),
        }
    }
}

fn fuzzy_match(needle: &str) -> Option<Field> {
    Field::ALL
        .into_iter()
        .map(|f| (f, strsim::jaro_winkler(needle, f.key())))
        .filter(|(_, score)| *score >= FUZZY_HEADER_THRESHOLD)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(f, _)| f)
}

/// Combine one row with the mapping into a prospective contact. Empty cells
/// become `None` here; the email cell is carried verbatim (validation and
/// lower-casing happen in the dedup/suppression stage).
pub fn contact_from_row(sheet: &ParsedSheet, row: &RawRow, mapping: &ColumnMapping) -> CanonicalContact {
    let mut contact = CanonicalContact::default();
    for (idx, field) in mapping.slots().iter().enumerate() {
        let Some(field) = field else { continue };
        let cell = row.get(idx).trim();
        let value = (!cell.is_empty()).then(|| cell.to_string());
        match field {
            Field::Email => contact.email = cell.to_string(),
            Field::Name => contact.name = value,
            Field::Phone => contact.phone = value,
            Field::Country => contact.country = value,
            Field::State => contact.state = value,
            Field::City => contact.city = value,
            Field::Website => contact.website = value,
            Field::Profession => contact.profession = value,
            Field::Branch => contact.branch = value,
        }
    }
    contact
}
