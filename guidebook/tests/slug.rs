use guidebook::slug::slugify;
use proptest::prelude::*;

#[test]
fn lowercases_and_hyphenates() {
    assert_eq!(slugify("Recherche avancée"), "recherche-avancee");
    assert_eq!(slugify("Hello, World!"), "hello-world");
    assert_eq!(slugify("  Multiple   Spaces  "), "multiple-spaces");
}

#[test]
fn strips_accents() {
    assert_eq!(slugify("Numéro d'affaire"), "numero-d-affaire");
    assert_eq!(slugify("Crédit-bail & Leasing"), "credit-bail-leasing");
    assert_eq!(slugify("Ça coûte où ?"), "ca-coute-ou");
}

#[test]
fn typographic_apostrophe_is_a_separator() {
    assert_eq!(slugify("Recherche par numéro d’affaire"), "recherche-par-numero-d-affaire");
}

#[test]
fn leading_digit_gets_prefix() {
    assert_eq!(slugify("2024 report"), "sec-2024-report");
    assert_eq!(slugify("1. Ajouter un document"), "sec-1-ajouter-un-document");
    assert_eq!(slugify("Étape 2"), "etape-2");
}

#[test]
fn empty_and_punctuation_only() {
    assert_eq!(slugify(""), "");
    assert_eq!(slugify("   "), "");
    assert_eq!(slugify("!!! ???"), "");
}

#[test]
fn non_latin_letters_collapse() {
    assert_eq!(slugify("Straße"), "stra-e");
    assert_eq!(slugify("日本語 guide"), "guide");
}

#[test]
fn accent_and_punctuation_variants_collide() {
    assert_eq!(slugify("Numéro tiers"), slugify("numero -- tiers"));
}

proptest! {
    #[test]
    fn idempotent(text in "\\PC*") {
        let once = slugify(&text);
        prop_assert_eq!(slugify(&once), once);
    }

    #[test]
    fn never_starts_with_digit(text in "\\PC*") {
        let slug = slugify(&text);
        prop_assert!(!slug.starts_with(|c: char| c.is_ascii_digit()));
    }

    #[test]
    fn only_slug_characters(text in "\\PC*") {
        let slug = slugify(&text);
        prop_assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        prop_assert!(!slug.starts_with('-') && !slug.ends_with('-'));
        prop_assert!(!slug.contains("--"));
    }
}
