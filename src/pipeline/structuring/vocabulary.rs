//! Heuristic vocabularies used by the form structurer.
//!
//! Everything here is plain data so it can be swapped through `FormConfig`
//! without touching the extraction code. Terms are stored lowercase.

use serde::{Deserialize, Serialize};

use super::ocr_tolerance::closest_term;
use super::ConfigError;
use crate::models::{SystemStatus, TemperatureMethod};

/// Complaint words that disqualify a patient-name capture.
///
/// Matching is by substring, so this is lossy: a surname containing
/// "ache" is rejected too.
const SYMPTOM_TERMS: &[&str] = &[
    "pain", "ache", "fever", "cough", "shortness", "breath", "nausea", "vomiting",
    "diarrhea", "headache", "dizziness", "fatigue", "weakness", "difficulty", "wheezing",
    "tightness",
];

const UNREMARKABLE_TERMS: &[&str] = &["normal", "unremarkable", "negative"];
const ABNORMAL_TERMS: &[&str] = &["abnormal", "positive", "remarkable"];

const SIGNATURE_AFFIRMATIVE: &[&str] = &["signed", "signature", "✓", "✔", "☑"];
// Checked before the affirmative list: each of these contains an affirmative word.
const SIGNATURE_NEGATIVE: &[&str] = &["unsigned", "not signed", "no signature"];
const SIGNATURE_NEGATIVE_GLYPHS: &[&str] = &["☐", "□"];

const REDACTION_MARKERS: &[&str] = &["[redacted]"];
const NOT_APPLICABLE: &[&str] = &["n/a"];

/// Keywords that reveal how a temperature was taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodKeywords {
    pub method: TemperatureMethod,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    pub symptom_terms: Vec<String>,
    pub unremarkable_terms: Vec<String>,
    pub abnormal_terms: Vec<String>,
    pub signature_affirmative: Vec<String>,
    pub signature_negative: Vec<String>,
    pub signature_negative_glyphs: Vec<String>,
    pub redaction_markers: Vec<String>,
    pub not_applicable: Vec<String>,
    /// Checked in order; the first method with a matching keyword wins.
    pub temperature_methods: Vec<MethodKeywords>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            symptom_terms: owned(SYMPTOM_TERMS),
            unremarkable_terms: owned(UNREMARKABLE_TERMS),
            abnormal_terms: owned(ABNORMAL_TERMS),
            signature_affirmative: owned(SIGNATURE_AFFIRMATIVE),
            signature_negative: owned(SIGNATURE_NEGATIVE),
            signature_negative_glyphs: owned(SIGNATURE_NEGATIVE_GLYPHS),
            redaction_markers: owned(REDACTION_MARKERS),
            not_applicable: owned(NOT_APPLICABLE),
            temperature_methods: vec![
                method(TemperatureMethod::Oral, &["oral", "po"]),
                method(TemperatureMethod::Tympanic, &["tympanic", "ear"]),
                method(TemperatureMethod::Temporal, &["temporal", "forehead"]),
                method(TemperatureMethod::Axillary, &["axillary", "armpit"]),
                method(TemperatureMethod::Rectal, &["rectal", "rect"]),
            ],
        }
    }
}

impl Vocabulary {
    /// Lowercase every term and reject tables the structurer cannot work without.
    pub fn prepared(mut self) -> Result<Self, ConfigError> {
        if self.unremarkable_terms.is_empty() {
            return Err(ConfigError::EmptyVocabulary("unremarkable_terms"));
        }
        if self.abnormal_terms.is_empty() {
            return Err(ConfigError::EmptyVocabulary("abnormal_terms"));
        }

        for list in [
            &mut self.symptom_terms,
            &mut self.unremarkable_terms,
            &mut self.abnormal_terms,
            &mut self.signature_affirmative,
            &mut self.signature_negative,
            &mut self.signature_negative_glyphs,
            &mut self.redaction_markers,
            &mut self.not_applicable,
        ] {
            lowercase_terms(list);
        }
        for entry in &mut self.temperature_methods {
            lowercase_terms(&mut entry.keywords);
        }

        Ok(self)
    }

    /// True when the text reads like a complaint rather than a person's name.
    pub fn looks_like_symptom(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.symptom_terms
            .iter()
            .any(|term| lower.contains(term.as_str()))
    }

    pub fn is_redacted(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.redaction_markers
            .iter()
            .any(|marker| lower.contains(marker.as_str()))
    }

    /// True when the whole body is a "not applicable" placeholder.
    pub fn is_not_applicable(&self, text: &str) -> bool {
        let lower = text.trim().to_lowercase();
        self.not_applicable.iter().any(|na| *na == lower)
    }

    /// Classify one status word from a review-of-systems line.
    /// Whole-word only: "abnormal" is never read as "normal".
    pub fn classify_status(&self, token: &str) -> Option<SystemStatus> {
        let lower = token.to_lowercase();
        let terms = self
            .unremarkable_terms
            .iter()
            .chain(self.abnormal_terms.iter())
            .map(String::as_str);
        let term = closest_term(&lower, terms)?;

        if self.unremarkable_terms.iter().any(|t| t == term) {
            Some(SystemStatus::Unremarkable)
        } else {
            Some(SystemStatus::Abnormal)
        }
    }
}

/// Lowercase and collapse runs of whitespace so phrase terms match OCR spacing.
pub fn fold_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Does `haystack` contain `term`? Alphabetic terms must stand as whole
/// words ("po" does not match "temporal"); glyph terms match anywhere.
/// Both inputs are expected to be folded already.
pub fn contains_term(haystack: &str, term: &str) -> bool {
    if term.is_empty() {
        return false;
    }
    if !term.chars().any(char::is_alphanumeric) {
        return haystack.contains(term);
    }

    haystack.match_indices(term).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + term.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

fn owned(terms: &[&str]) -> Vec<String> {
    terms.iter().map(|t| (*t).to_string()).collect()
}

fn method(method: TemperatureMethod, keywords: &[&str]) -> MethodKeywords {
    MethodKeywords {
        method,
        keywords: owned(keywords),
    }
}

fn lowercase_terms(list: &mut Vec<String>) {
    for term in list.iter_mut() {
        *term = fold_text(term);
    }
    list.retain(|t| !t.is_empty());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symptom_guard_matches_substrings() {
        let vocab = Vocabulary::default();
        assert!(vocab.looks_like_symptom("Shortness of breath"));
        assert!(vocab.looks_like_symptom("CHEST PAIN"));
        assert!(!vocab.looks_like_symptom("Jane Doe"));
    }

    #[test]
    fn symptom_guard_is_lossy_for_names_containing_terms() {
        // Known limitation: "ache" inside a surname still trips the guard
        let vocab = Vocabulary::default();
        assert!(vocab.looks_like_symptom("Maria Pachecos"));
    }

    #[test]
    fn redaction_is_case_insensitive() {
        let vocab = Vocabulary::default();
        assert!(vocab.is_redacted("[REDACTED]"));
        assert!(vocab.is_redacted("DOB [redacted] 1970"));
        assert!(!vocab.is_redacted("redacted"));
    }

    #[test]
    fn not_applicable_requires_whole_body() {
        let vocab = Vocabulary::default();
        assert!(vocab.is_not_applicable(" N/A "));
        assert!(!vocab.is_not_applicable("N/A\nPenicillin"));
    }

    #[test]
    fn classify_status_synonyms() {
        let vocab = Vocabulary::default();
        assert_eq!(vocab.classify_status("Normal"), Some(SystemStatus::Unremarkable));
        assert_eq!(vocab.classify_status("NEGATIVE"), Some(SystemStatus::Unremarkable));
        assert_eq!(vocab.classify_status("Unremarkable"), Some(SystemStatus::Unremarkable));
        assert_eq!(vocab.classify_status("Abnormal"), Some(SystemStatus::Abnormal));
        assert_eq!(vocab.classify_status("positive"), Some(SystemStatus::Abnormal));
        assert_eq!(vocab.classify_status("Remarkable"), Some(SystemStatus::Abnormal));
        assert_eq!(vocab.classify_status("Unremakable"), Some(SystemStatus::Unremarkable));
        assert_eq!(vocab.classify_status("deferred"), None);
    }

    #[test]
    fn contains_term_respects_word_boundaries() {
        assert!(contains_term("98.6 f po", "po"));
        assert!(!contains_term("temporal scan", "po"));
        assert!(!contains_term("unsigned", "signed"));
        assert!(contains_term("☑ on file", "☑"));
        assert!(contains_term("no signature on form", "no signature"));
    }

    #[test]
    fn fold_text_collapses_spacing() {
        assert_eq!(fold_text("  Not \t SIGNED\n"), "not signed");
    }

    #[test]
    fn prepared_lowercases_custom_terms() {
        let vocab = Vocabulary {
            symptom_terms: vec!["Vertigo".into(), "  ".into()],
            ..Vocabulary::default()
        }
        .prepared()
        .unwrap();
        assert_eq!(vocab.symptom_terms, vec!["vertigo".to_string()]);
    }

    #[test]
    fn prepared_rejects_empty_status_tables() {
        let vocab = Vocabulary {
            abnormal_terms: vec![],
            ..Vocabulary::default()
        };
        assert!(matches!(
            vocab.prepared(),
            Err(ConfigError::EmptyVocabulary("abnormal_terms"))
        ));
    }
}
