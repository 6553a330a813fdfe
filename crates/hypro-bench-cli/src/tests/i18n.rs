// crates/hypro-bench-cli/src/tests/i18n.rs
// ============================================================================
// Module: CLI i18n Tests
// Description: Unit tests for catalog parity and locale parsing.
// Purpose: Ensure CLI localization remains consistent across supported locales.
// Dependencies: hypro-bench-cli i18n module
// ============================================================================

//! ## Overview
//! Verifies the CLI message catalogs stay in sync, locale parsing is tolerant,
//! and locale templates preserve placeholder parity with English.

use std::collections::BTreeSet;

use crate::i18n::Locale;
use crate::i18n::MessageArg;
use crate::i18n::SUPPORTED_LOCALES;
use crate::i18n::catalog_entries_for;
use crate::i18n::catalog_for;
use crate::i18n::translate;

fn placeholder_names(template: &str) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1 ..];
        let end = after.find('}').unwrap_or_else(|| panic!("unclosed placeholder in {template}"));
        let name = &after[.. end];
        assert!(
            !name.is_empty() && name.chars().all(|ch| ch.is_ascii_lowercase() || ch == '_'),
            "invalid placeholder '{name}' in {template}"
        );
        names.insert(name.to_string());
        rest = &after[end + 1 ..];
    }
    names
}

#[test]
fn catalogs_have_matching_keys() {
    assert!(SUPPORTED_LOCALES.contains(&Locale::En), "English must remain the baseline locale");
    let en_keys: BTreeSet<&'static str> = catalog_for(Locale::En).keys().copied().collect();
    for locale in SUPPORTED_LOCALES {
        let locale_keys: BTreeSet<&'static str> = catalog_for(*locale).keys().copied().collect();
        assert_eq!(en_keys, locale_keys, "locale catalogs must stay in parity ({locale:?})");
    }
}

#[test]
fn catalogs_have_unique_keys_per_locale() {
    for locale in SUPPORTED_LOCALES {
        let entries = catalog_entries_for(*locale);
        let keys: BTreeSet<&str> = entries.iter().map(|(key, _)| *key).collect();
        assert_eq!(keys.len(), entries.len(), "duplicate catalog keys ({locale:?})");
    }
}

#[test]
fn catalogs_have_placeholder_parity_with_english() {
    let en_catalog = catalog_for(Locale::En);
    for (key, en_template) in en_catalog {
        let expected = placeholder_names(en_template);
        for locale in SUPPORTED_LOCALES {
            let template = catalog_for(*locale)
                .get(key)
                .copied()
                .unwrap_or_else(|| panic!("missing key '{key}' in locale {locale:?}"));
            assert_eq!(
                expected,
                placeholder_names(template),
                "placeholder set mismatch for key '{key}' in locale {locale:?}"
            );
        }
    }
}

#[test]
fn catalan_differs_for_curated_keys() {
    for key in ["config.validate.ok", "run.launch_failed", "i18n.disclaimer.machine_translated"] {
        let en = catalog_for(Locale::En).get(key).copied().expect("en key exists");
        let ca = catalog_for(Locale::Ca).get(key).copied().expect("ca key exists");
        assert_ne!(en, ca, "Catalan must differ from English for '{key}'");
    }
}

#[test]
fn locale_parse_accepts_region_tags_and_case() {
    assert_eq!(Locale::parse("en"), Some(Locale::En));
    assert_eq!(Locale::parse("EN"), Some(Locale::En));
    assert_eq!(Locale::parse("en-US"), Some(Locale::En));
    assert_eq!(Locale::parse("ca_ES"), Some(Locale::Ca));
    assert_eq!(Locale::parse(""), None);
    assert_eq!(Locale::parse("de"), None);
}

#[test]
fn locale_labels_are_canonical() {
    assert_eq!(Locale::En.as_str(), "en");
    assert_eq!(Locale::Ca.as_str(), "ca");
}

#[test]
fn translate_substitutes_placeholders() {
    let output = translate(
        "run.launch_failed",
        vec![
            MessageArg::new("program", "../app/HyPro"),
            MessageArg::new("system", "gni/p1_1bit.txt"),
            MessageArg::new("error", "not found"),
        ],
    );
    assert!(output.contains("../app/HyPro"));
    assert!(output.contains("gni/p1_1bit.txt"));
}

#[test]
fn translate_falls_back_to_key() {
    assert_eq!(translate("missing.key", Vec::new()), "missing.key");
}
