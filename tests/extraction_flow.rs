// tests/extraction_flow.rs
//
// The headerless extraction flow: positional columns, dedup at parse,
// name stats, defaults, and the re-importable export shape.

use contact_list_sanitizer::classify::ReferenceData;
use contact_list_sanitizer::config::SanitizerConfig;
use contact_list_sanitizer::contact::DefaultValues;
use contact_list_sanitizer::error::SanitizeError;
use contact_list_sanitizer::export::{export_extraction, BOM};
use contact_list_sanitizer::pipeline::run_extraction;

async fn extract(text: &str, defaults: DefaultValues) -> contact_list_sanitizer::pipeline::ExtractionOutcome {
    run_extraction(
        text,
        &defaults,
        &SanitizerConfig::default(),
        ReferenceData::builtin(),
        |_| {},
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn positional_columns_and_name_derivation() {
    let text = "joao.silva@gmail.com;Brasil;SP;Campinas;Advogado;Direito\ncontato@empresa.com\n";
    let out = extract(text, DefaultValues::default()).await;

    assert_eq!(out.contacts.len(), 2);
    let first = &out.contacts[0];
    assert_eq!(first.name.as_deref(), Some("Joao Silva"));
    assert_eq!(first.country.as_deref(), Some("Brasil"));
    assert_eq!(first.city.as_deref(), Some("Campinas"));
    assert_eq!(first.website, None);

    let second = &out.contacts[1];
    assert_eq!(second.name.as_deref(), Some("Empresa"));
    assert_eq!(second.website.as_deref(), Some("https://empresa.com"));
    assert_eq!(out.report.names_extracted, 2);
}

#[tokio::test]
async fn duplicates_and_hash_addresses_are_counted() {
    let text = "a@x.com\nA@X.COM\na1b2c3d4e5f6a1b2c3d4e5f6a1b2c3d4@x.com\nnot-an-email\n";
    let out = extract(text, DefaultValues::default()).await;
    assert_eq!(out.report.total, 4);
    assert_eq!(out.report.processed, 1);
    assert_eq!(out.report.duplicates, 1);
    assert_eq!(out.report.suspicious, 1);
    assert_eq!(out.report.invalid, 1);
}

#[tokio::test]
async fn defaults_apply_to_empty_positional_fields() {
    let defaults = DefaultValues {
        country: Some("Brasil".into()),
        profession: Some("Dentista".into()),
        branch: None,
    };
    let text = "maria@gmail.com;;SP\npedro@gmail.com;Portugal\n";
    let out = extract(text, defaults).await;
    assert_eq!(out.contacts[0].country.as_deref(), Some("Brasil"));
    assert_eq!(out.contacts[0].state.as_deref(), Some("SP"));
    assert_eq!(out.contacts[0].profession.as_deref(), Some("Dentista"));
    assert_eq!(out.contacts[1].country.as_deref(), Some("Portugal"));
}

#[tokio::test]
async fn empty_input_is_an_error() {
    let result = run_extraction(
        "  \n \r\n",
        &DefaultValues::default(),
        &SanitizerConfig::default(),
        ReferenceData::builtin(),
        |_| {},
    )
    .await;
    assert!(matches!(result, Err(SanitizeError::EmptyInput)));
}

#[tokio::test]
async fn export_is_reparsable_by_the_import_parser() {
    let text = "joao.silva@gmail.com;Brasil\ncontato@empresa.com\n";
    let out = extract(text, DefaultValues::default()).await;
    let blob = export_extraction(&out.contacts);

    assert!(blob.starts_with(BOM));
    let sheet = contact_list_sanitizer::parse::parse_sheet(blob.trim_start_matches(BOM)).unwrap();
    assert_eq!(sheet.headers[0], "email");
    assert_eq!(sheet.rows.len(), out.contacts.len());
    assert_eq!(sheet.value(&sheet.rows[0], "name"), Some("Joao Silva"));
}
