// tests/classify_handpicked.rs
//
// Handpicked classifier cases covering the whole name cascade and the
// domain/website split.

use contact_list_sanitizer::classify::{classify_and_extract, EmailCheck, ReferenceData, NAME_UNKNOWN};

fn classify(email: &str) -> contact_list_sanitizer::classify::Extraction {
    classify_and_extract(email, ReferenceData::builtin())
}

#[test]
fn dictionary_separator_hit_on_webmail() {
    let out = classify("joao.silva@gmail.com");
    assert_eq!(out.check, EmailCheck::Valid);
    assert!(out.name.starts_with("Joao"));
    assert_eq!(out.name, "Joao Silva");
    assert_eq!(out.website, None);
}

#[test]
fn corporate_role_address_falls_back_to_domain_label() {
    let out = classify("contato@empresa.com");
    assert_eq!(out.name, "Empresa");
    assert_eq!(out.website.as_deref(), Some("https://empresa.com"));
}

#[test]
fn hex_hash_local_part_is_suspicious() {
    let out = classify("a1b2c3d4e5f6a1b2c3d4e5f6a1b2c3d4@x.com");
    assert_eq!(out.check, EmailCheck::Suspicious);
    assert_eq!(out.name, NAME_UNKNOWN);
    assert_eq!(out.website, None);
}

#[test]
fn shape_failures_always_get_the_sentinel() {
    for bad in ["", "bad-email", "@x.com", "a@b", "two words@x.com"] {
        let out = classify(bad);
        assert_eq!(out.check, EmailCheck::Invalid, "input: {bad:?}");
        assert_eq!(out.name, NAME_UNKNOWN, "input: {bad:?}");
    }
}

#[test]
fn digits_stripped_then_dictionary_prefix() {
    let out = classify("maria2024@yahoo.com.br");
    assert_eq!(out.name, "Maria");
    assert_eq!(out.website, None);
}

#[test]
fn webmail_fallback_accepts_undictionaried_words() {
    // Not in the name list, but a webmail local part is probably a person.
    let out = classify("xkarvalho@gmail.com");
    assert_eq!(out.name, "Xkarvalho");
}

#[test]
fn corporate_dictionary_prefix_beats_domain_label() {
    let out = classify("pedro@empresa.com.br");
    assert_eq!(out.name, "Pedro");
    assert_eq!(out.website.as_deref(), Some("https://empresa.com.br"));
}

#[test]
fn separator_segments_drop_short_and_numeric_pieces() {
    // "j" is too short to be a segment; the remaining segment still hits
    // the dictionary.
    let out = classify("j.fernando42@uol.com.br");
    assert_eq!(out.name, "Fernando");
}

#[test]
fn whole_local_survives_when_separators_leave_nothing() {
    // Every segment is length 1, so the separator rule passes; the whole
    // cleaned local part (webmail) steps in.
    let out = classify("a.b@gmail.com");
    assert_eq!(out.name, "A.b");
}

#[test]
fn generic_country_variant_is_still_generic() {
    let out = classify("suporte@hotmail.com.br");
    assert_eq!(out.website, None);
}
