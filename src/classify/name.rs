//! Name derivation from an email's local part.
//!
//! An ordered cascade of pure rules, evaluated in sequence, first success
//! wins. Each rule sees the digit-stripped local part plus the domain
//! classification and produces a candidate name or passes. Keeping the
//! rules independent makes each one testable on its own and keeps the
//! precedence explicit in one place.

use super::reference::ReferenceData;

pub const SEPARATORS: [char; 3] = ['.', '_', '-'];

/// Everything a rule is allowed to look at.
pub struct NameContext<'a> {
    /// Local part with all digits stripped, original casing lost to the
    /// earlier lower-casing step.
    pub clean_local: &'a str,
    pub domain: &'a str,
    pub generic_domain: bool,
    pub reference: &'a ReferenceData,
}

type NameRule = fn(&NameContext<'_>) -> Option<String>;

/// Cascade order is the contract; see each rule for its gate.
const RULES: [NameRule; 4] = [
    rule_separator_segments,
    rule_whole_local,
    rule_corporate_domain_label,
    rule_cleaned_local,
];

/// Run the cascade. `None` means every rule passed; the caller renders
/// the unknown-name sentinel.
pub fn derive_name(ctx: &NameContext<'_>) -> Option<String> {
    RULES.iter().find_map(|rule| rule(ctx))
}

/// `joao.silva` → `Joao Silva`: split on separators, keep non-numeric
/// segments longer than one char, and require the first segment to look
/// like a first name (dictionary prefix, or any word on a webmail
/// domain). All retained segments join the result.
fn rule_separator_segments(ctx: &NameContext<'_>) -> Option<String> {
    if !ctx.clean_local.contains(SEPARATORS) {
        return None;
    }
    let segments: Vec<&str> = ctx
        .clean_local
        .split(SEPARATORS)
        .filter(|s| s.chars().count() > 1 && !is_numeric(s))
        .collect();
    let first = segments.first()?;
    first_name_candidate(first, ctx)?;
    Some(
        segments
            .iter()
            .map(|s| capitalize(s))
            .collect::<Vec<_>>()
            .join(" "),
    )
}

/// The whole cleaned local part as a single name: a dictionary prefix hit
/// yields the matched name (`joaosilva` → `Joao`); on webmail domains any
/// non-numeric word longer than one char passes as-is, since a personal
/// address is likelier than a role address there. Known weakness: that
/// fallback also capitalizes role words (`info@gmail.com` → `Info`).
fn rule_whole_local(ctx: &NameContext<'_>) -> Option<String> {
    first_name_candidate(ctx.clean_local, ctx)
}

/// `contato@empresa.com` → `Empresa`: on corporate domains the first
/// domain label stands in for the organization name.
fn rule_corporate_domain_label(ctx: &NameContext<'_>) -> Option<String> {
    if ctx.generic_domain {
        return None;
    }
    let label = ctx.domain.split('.').next()?;
    (label.chars().count() >= 2).then(|| capitalize(label))
}

/// Last resort: the cleaned local part itself, when it has at least two
/// chars left.
fn rule_cleaned_local(ctx: &NameContext<'_>) -> Option<String> {
    (ctx.clean_local.chars().count() >= 2).then(|| capitalize(ctx.clean_local))
}

/// Shared gate for "does this word read as a first name".
fn first_name_candidate(word: &str, ctx: &NameContext<'_>) -> Option<String> {
    if let Some(known) = ctx.reference.first_name_prefix(word) {
        return Some(capitalize(known));
    }
    if ctx.generic_domain && word.chars().count() > 1 && !is_numeric(word) {
        return Some(capitalize(word));
    }
    None
}

fn is_numeric(s: &str) -> bool {
    s.is_empty() || s.chars().all(|c| c.is_ascii_digit())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx<'a>(clean_local: &'a str, domain: &'a str, reference: &'a ReferenceData) -> NameContext<'a> {
        NameContext {
            clean_local,
            domain,
            generic_domain: reference.is_generic_domain(domain),
            reference,
        }
    }

    #[test]
    fn separator_segments_join_on_dictionary_hit() {
        let r = ReferenceData::builtin();
        let name = derive_name(&ctx("joao.silva", "gmail.com", r));
        assert_eq!(name.as_deref(), Some("Joao Silva"));
    }

    #[test]
    fn separator_segments_pass_without_dictionary_hit_on_corporate() {
        let r = ReferenceData::builtin();
        // "xyzk.wq" has no dictionary first segment; corporate domain falls
        // through to the domain label.
        let name = derive_name(&ctx("xyzk.wq", "empresa.com", r));
        assert_eq!(name.as_deref(), Some("Empresa"));
    }

    #[test]
    fn separator_segments_accept_any_word_on_webmail() {
        let r = ReferenceData::builtin();
        let name = derive_name(&ctx("xyzk.wq", "gmail.com", r));
        assert_eq!(name.as_deref(), Some("Xyzk Wq"));
    }

    #[test]
    fn whole_local_dictionary_prefix_wins_on_corporate_too() {
        let r = ReferenceData::builtin();
        let name = derive_name(&ctx("joaosilva", "empresa.com", r));
        assert_eq!(name.as_deref(), Some("Joao"));
    }

    #[test]
    fn webmail_fallback_capitalizes_role_words() {
        let r = ReferenceData::builtin();
        // Known heuristic weakness, kept on purpose.
        let name = derive_name(&ctx("info", "gmail.com", r));
        assert_eq!(name.as_deref(), Some("Info"));
    }

    #[test]
    fn corporate_label_needs_two_chars() {
        let r = ReferenceData::builtin();
        let name = derive_name(&ctx("zz", "x.com", r));
        // Domain label "x" is too short; the cleaned local part steps in.
        assert_eq!(name.as_deref(), Some("Zz"));
    }

    #[test]
    fn exhausted_cascade_yields_none() {
        let r = ReferenceData::builtin();
        assert_eq!(derive_name(&ctx("", "z.com", r)), None);
        assert_eq!(derive_name(&ctx("a", "b.co", r)), None);
    }
}
