use anyhow::{Result, anyhow};
use isolang::Language;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::errors::TranslationError;

/// Language utilities for language code handling
///
/// This module validates and normalizes ISO 639-1 / ISO 639-2 codes, keeps
/// the table of supported target languages, and wraps language detection.
/// Target languages use the locale-style codes of multilingual seq2seq
/// models (`hi_IN`, `en_XX`), whose prefix is an ISO 639-1 code.

/// ISO 639-2/B codes that differ from their ISO 639-2/T counterpart
const PART2B_TO_PART2T: &[(&str, &str)] = &[
    ("fre", "fra"),
    ("ger", "deu"),
    ("dut", "nld"),
    ("gre", "ell"),
    ("chi", "zho"),
    ("cze", "ces"),
    ("ice", "isl"),
    ("alb", "sqi"),
    ("arm", "hye"),
    ("baq", "eus"),
    ("bur", "mya"),
    ("per", "fas"),
    ("geo", "kat"),
    ("may", "msa"),
    ("mac", "mkd"),
    ("rum", "ron"),
    ("slo", "slk"),
    ("wel", "cym"),
];

fn part2b_to_part2t(code: &str) -> Option<&'static str> {
    PART2B_TO_PART2T
        .iter()
        .find(|(b, _)| *b == code)
        .map(|(_, t)| *t)
}

/// Strip a locale suffix: `hi_IN` and `pt-BR` become `hi` and `pt`
pub fn base_language_code(code: &str) -> String {
    code.trim()
        .split(['_', '-'])
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

/// Normalize a language code to ISO 639-2/T (3-letter) format
pub fn normalize_to_part2t(code: &str) -> Result<String> {
    let normalized_code = base_language_code(code);

    if normalized_code.len() == 2 {
        if let Some(lang) = Language::from_639_1(&normalized_code) {
            return Ok(lang.to_639_3().to_string());
        }
    } else if normalized_code.len() == 3 {
        if Language::from_639_3(&normalized_code).is_some() {
            return Ok(normalized_code);
        }
        if let Some(part2t) = part2b_to_part2t(&normalized_code) {
            return Ok(part2t.to_string());
        }
    }

    Err(anyhow!("Cannot normalize invalid language code: {}", code))
}

/// Normalize a language code to ISO 639-1 (2-letter) format if possible
/// Falls back to ISO 639-2/T if no ISO 639-1 code exists
pub fn normalize_to_part1_or_part2t(code: &str) -> Result<String> {
    let part2t = normalize_to_part2t(code)?;
    let lang = Language::from_639_3(&part2t)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", part2t))?;

    Ok(lang
        .to_639_1()
        .map(|c| c.to_string())
        .unwrap_or(part2t))
}

/// Check if two language codes match (represent the same language)
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    match (normalize_to_part2t(code1), normalize_to_part2t(code2)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Get the English language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    let normalized = normalize_to_part2t(code)?;
    let lang = Language::from_639_3(&normalized)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", normalized))?;

    Ok(lang.to_name().to_string())
}

/// A target language offered to users
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageEntry {
    /// Model-facing code, e.g. `hi_IN`
    pub code: String,
    /// Human readable name, e.g. `Hindi`
    pub name: String,
}

impl LanguageEntry {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

/// The target languages of the default multilingual model
pub fn default_target_languages() -> Vec<LanguageEntry> {
    vec![
        LanguageEntry::new("en_XX", "English"),
        LanguageEntry::new("ta_IN", "Tamil"),
        LanguageEntry::new("te_IN", "Telugu"),
        LanguageEntry::new("ml_IN", "Malayalam"),
        LanguageEntry::new("mr_IN", "Marathi"),
        LanguageEntry::new("hi_IN", "Hindi"),
    ]
}

/// Ordered set of supported target languages
#[derive(Debug, Clone)]
pub struct SupportedLanguages {
    entries: Vec<LanguageEntry>,
}

impl SupportedLanguages {
    pub fn new(entries: Vec<LanguageEntry>) -> Self {
        Self { entries }
    }

    /// All entries in configured order
    pub fn entries(&self) -> &[LanguageEntry] {
        &self.entries
    }

    /// Look up an entry by exact code
    pub fn get(&self, code: &str) -> Option<&LanguageEntry> {
        self.entries.iter().find(|e| e.code == code.trim())
    }

    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    /// Display names in configured order
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }

    /// Resolve a requested target code or fail with the list of supported names
    pub fn validate(&self, code: &str) -> Result<&LanguageEntry, TranslationError> {
        self.get(code).ok_or_else(|| TranslationError::UnsupportedLanguage {
            code: code.to_string(),
            supported: self.names(),
        })
    }
}

impl Default for SupportedLanguages {
    fn default() -> Self {
        Self::new(default_target_languages())
    }
}

/// Result of language detection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectedLanguage {
    /// ISO 639-1 code when one exists, ISO 639-3 otherwise
    pub code: String,
    /// English name of the language
    pub name: String,
    /// Detector confidence in `[0, 1]`
    pub confidence: f64,
    pub reliable: bool,
}

/// Detect the language of `text`.
///
/// Empty input or input the detector cannot classify fails with
/// `TranslationError::Detection`. When `require_reliable` is set an
/// unreliable guess is rejected as well.
pub fn detect_language(text: &str, require_reliable: bool) -> Result<DetectedLanguage, TranslationError> {
    if text.trim().is_empty() {
        return Err(TranslationError::Detection("no text to analyze".to_string()));
    }

    let info = whatlang::detect(text)
        .ok_or_else(|| TranslationError::Detection("language could not be determined".to_string()))?;

    let part3 = info.lang().code();
    let code = normalize_to_part1_or_part2t(part3).unwrap_or_else(|_| part3.to_string());
    let name = get_language_name(&code).unwrap_or_else(|_| info.lang().eng_name().to_string());

    if !info.is_reliable() {
        if require_reliable {
            return Err(TranslationError::Detection(format!(
                "ambiguous input, best guess {} with confidence {:.2}",
                code,
                info.confidence()
            )));
        }
        warn!("Unreliable language detection: {} ({:.2})", code, info.confidence());
    }

    debug!("Detected language {} ({}) with confidence {:.2}", code, name, info.confidence());

    Ok(DetectedLanguage {
        code,
        name,
        confidence: info.confidence(),
        reliable: info.is_reliable(),
    })
}
