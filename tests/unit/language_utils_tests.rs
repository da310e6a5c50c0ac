/*!
 * Tests for language utility functions
 */

use doctranslate::errors::TranslationError;
use doctranslate::language_utils::{
    base_language_code, default_target_languages, detect_language, get_language_name, language_codes_match,
    normalize_to_part1_or_part2t, normalize_to_part2t, LanguageEntry, SupportedLanguages,
};

use crate::common::ENGLISH_TEXT;

/// Test normalization of language codes to ISO 639-2/T format
#[test]
fn test_normalize_to_part2t_withValidCodes_shouldNormalizeCorrectly() {
    assert_eq!(normalize_to_part2t("en").unwrap(), "eng");
    assert_eq!(normalize_to_part2t("hi").unwrap(), "hin");
    assert_eq!(normalize_to_part2t("tam").unwrap(), "tam");
    assert_eq!(normalize_to_part2t("fre").unwrap(), "fra");

    // Locale suffixes are ignored
    assert_eq!(normalize_to_part2t("hi_IN").unwrap(), "hin");
    assert_eq!(normalize_to_part2t("en_XX").unwrap(), "eng");

    // Case and whitespace
    assert_eq!(normalize_to_part2t(" EN ").unwrap(), "eng");

    assert!(normalize_to_part2t("x1").is_err());
    assert!(normalize_to_part2t("invalid").is_err());
    assert!(normalize_to_part2t("").is_err());
}

#[test]
fn test_normalize_to_part1_or_part2t_shouldPreferTwoLetterCodes() {
    assert_eq!(normalize_to_part1_or_part2t("eng").unwrap(), "en");
    assert_eq!(normalize_to_part1_or_part2t("mar").unwrap(), "mr");
}

#[test]
fn test_base_language_code_shouldStripLocale() {
    assert_eq!(base_language_code("hi_IN"), "hi");
    assert_eq!(base_language_code("pt-BR"), "pt");
    assert_eq!(base_language_code("en"), "en");
}

/// Test matching of different language code formats
#[test]
fn test_language_codes_match_withMatchingCodes_shouldReturnTrue() {
    assert!(language_codes_match("en", "eng"));
    assert!(language_codes_match("en_XX", "en"));
    assert!(language_codes_match("ta_IN", "tam"));
    assert!(!language_codes_match("en", "hi"));
    assert!(!language_codes_match("en", "invalid"));
}

#[test]
fn test_get_language_name_shouldReturnEnglishName() {
    assert_eq!(get_language_name("te").unwrap(), "Telugu");
    assert_eq!(get_language_name("ml_IN").unwrap(), "Malayalam");
}

#[test]
fn test_default_target_languages_shouldListSixInOrder() {
    let codes: Vec<String> = default_target_languages().into_iter().map(|e| e.code).collect();
    assert_eq!(codes, vec!["en_XX", "ta_IN", "te_IN", "ml_IN", "mr_IN", "hi_IN"]);
}

#[test]
fn test_supported_languages_validate_withUnsupportedCode_shouldListNames() {
    let supported = SupportedLanguages::default();
    let err = supported.validate("fr_XX").unwrap_err();

    match &err {
        TranslationError::UnsupportedLanguage { code, supported } => {
            assert_eq!(code, "fr_XX");
            assert_eq!(supported.len(), 6);
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(
        err.to_string(),
        "Sorry, we only support translations to these languages: English, Tamil, Telugu, Malayalam, Marathi, Hindi"
    );
}

#[test]
fn test_supported_languages_withCustomEntries_shouldBeExtensible() {
    let mut entries = default_target_languages();
    entries.push(LanguageEntry::new("fr_XX", "French"));
    let supported = SupportedLanguages::new(entries);

    assert_eq!(supported.validate("fr_XX").unwrap().name, "French");
    assert!(supported.contains("hi_IN"));
}

#[test]
fn test_detect_language_withEnglishText_shouldReturnEn() {
    let detected = detect_language(ENGLISH_TEXT, false).unwrap();

    assert_eq!(detected.code, "en");
    assert_eq!(detected.name, "English");
    assert!(detected.confidence > 0.0);
}

#[test]
fn test_detect_language_withEmptyText_shouldFail() {
    let err = detect_language("   ", false).unwrap_err();
    assert!(matches!(err, TranslationError::Detection(_)));
}

#[test]
fn test_detect_language_withDigitsOnly_shouldFail() {
    let err = detect_language("12345 67890 !!!", false).unwrap_err();
    assert!(matches!(err, TranslationError::Detection(_)));
}
