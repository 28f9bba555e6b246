//! Visit-form structurer: runs every field and section rule over the OCR
//! text and assembles one `MedicalRecord`.
//!
//! Single pass, no I/O, no state carried between calls. Each field fails
//! locally into `None`; nothing here can abort the record.

use super::field::{FieldRule, FieldTable};
use super::form_config::FormConfig;
use super::normalize::{
    classify_signature, normalize_blood_pressure, normalize_count, normalize_date,
    normalize_temperature,
};
use super::section::{
    classify_systems, detect_unchanged, extract_section, section_text, split_list, SectionKind,
    SummaryFlag,
};
use super::vocabulary::Vocabulary;
use super::ConfigError;
use crate::config::{DEFAULT_DOC_TYPE, DEFAULT_EXTRACTION_METHOD};
use crate::models::{
    Allergies, ClinicalStaff, Hpi, MedicalRecord, Medications, NormalizedField, Vitals,
};

/// Turns visit-form text into a `MedicalRecord`.
///
/// Immutable after construction and `Send + Sync`, so one instance can
/// serve any number of threads.
#[derive(Debug, Clone)]
pub struct FormStructurer {
    fields: FieldTable,
    vocabulary: Vocabulary,
    extraction_method: String,
    default_doc_type: String,
}

impl Default for FormStructurer {
    fn default() -> Self {
        Self {
            fields: FieldTable::builtin().clone(),
            vocabulary: Vocabulary::default(),
            extraction_method: DEFAULT_EXTRACTION_METHOD.to_string(),
            default_doc_type: DEFAULT_DOC_TYPE.to_string(),
        }
    }
}

impl FormStructurer {
    pub fn new(config: FormConfig) -> Result<Self, ConfigError> {
        let fields = FieldTable::with_overrides(&config.field_patterns)?;
        let vocabulary = config.vocabulary.prepared()?;

        tracing::debug!(
            pattern_overrides = config.field_patterns.len(),
            method = %config.extraction_method,
            "Form structurer configured"
        );

        Ok(Self {
            fields,
            vocabulary,
            extraction_method: config.extraction_method,
            default_doc_type: config.default_doc_type,
        })
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn fields(&self) -> &FieldTable {
        &self.fields
    }

    /// Structure one form. Total: every input, including the empty string,
    /// yields a fully-shaped record.
    pub fn structure(&self, text: &str) -> MedicalRecord {
        let span = tracing::info_span!("structure_form", input_len = text.len());
        let _enter = span.enter();

        if text.trim().is_empty() {
            tracing::debug!("Empty input text, returning all-null record");
        }

        let vocab = &self.vocabulary;

        let doc_type = self
            .scalar(text, FieldRule::DocType)
            .unwrap_or_else(|| self.default_doc_type.clone());

        let date_raw = self.fields.extract(text, FieldRule::DateOfService);
        let date_of_service = normalize_date(date_raw.as_deref(), vocab);

        let record = MedicalRecord {
            doc_type,
            location_of_care: self.scalar(text, FieldRule::LocationOfCare),
            date_of_service,
            visit_type: self.scalar(text, FieldRule::VisitType),
            patient_name: self.patient_name(text),
            vitals: self.vitals(text),
            medications: Medications {
                unchanged_from_summary: detect_unchanged(text, SummaryFlag::Medications),
                added_or_changed: self.list_section(text, SectionKind::MedicationsAdded),
                deleted: self.list_section(text, SectionKind::MedicationsDeleted),
            },
            allergies: Allergies {
                unchanged_from_summary: detect_unchanged(text, SummaryFlag::Allergies),
                new_allergies: extract_section(text, SectionKind::NewAllergies.rule())
                    .and_then(|body| section_text(body, vocab)),
            },
            clinical_staff: ClinicalStaff {
                printed_name: self.scalar(text, FieldRule::StaffName),
                signature_present: self
                    .scalar(text, FieldRule::Signature)
                    .and_then(|raw| classify_signature(Some(raw.as_str()), vocab)),
            },
            chief_complaint: self.scalar(text, FieldRule::ChiefComplaint),
            hpi: Hpi {
                symptoms_checked: self.list_section(text, SectionKind::Hpi),
                free_text: None,
            },
            review_of_systems: classify_systems(text, vocab),
            impression_or_diagnosis: self.scalar(text, FieldRule::Impression),
            source_quality_notes: provenance_note(&self.extraction_method, text),
        };

        if let Ok(value) = serde_json::to_value(&record) {
            let (populated, empty) = count_leaves(&value);
            tracing::info!(populated, empty, "Visit form structured");
        }

        record
    }

    /// Capture with the redaction guard applied.
    fn scalar(&self, text: &str, rule: FieldRule) -> Option<String> {
        let raw = self.fields.extract(text, rule)?;
        if self.vocabulary.is_redacted(&raw) {
            tracing::debug!(field = rule.name(), "Redacted capture, value dropped");
            None
        } else {
            Some(raw)
        }
    }

    /// Patient name with the redaction and symptom-phrase guards. The raw
    /// capture survives both.
    fn patient_name(&self, text: &str) -> NormalizedField<String> {
        let Some(raw) = self.fields.extract(text, FieldRule::PatientName) else {
            return NormalizedField::missing();
        };

        if self.vocabulary.is_redacted(&raw) {
            tracing::debug!(field = "patient_name", "Redacted capture, value dropped");
            return NormalizedField::rejected(raw);
        }
        if self.vocabulary.looks_like_symptom(&raw) {
            tracing::debug!(
                field = "patient_name",
                "Capture reads as a symptom phrase, value dropped"
            );
            return NormalizedField::rejected(raw);
        }

        NormalizedField::new(Some(raw.clone()), Some(raw))
    }

    fn vitals(&self, text: &str) -> Vitals {
        let temperature_raw = self.fields.extract(text, FieldRule::Temperature);

        Vitals {
            blood_pressure: self
                .scalar(text, FieldRule::BloodPressure)
                .and_then(|raw| normalize_blood_pressure(&raw)),
            pulse_rate: normalize_count(self.scalar(text, FieldRule::PulseRate).as_deref()),
            resp_rate: normalize_count(self.scalar(text, FieldRule::RespRate).as_deref()),
            temperature: normalize_temperature(temperature_raw.as_deref(), &self.vocabulary),
        }
    }

    fn list_section(&self, text: &str, kind: SectionKind) -> Option<Vec<String>> {
        extract_section(text, kind.rule()).and_then(|body| split_list(body, &self.vocabulary))
    }
}

/// Provenance line: extraction method and input length in characters.
pub fn provenance_note(method: &str, text: &str) -> String {
    format!(
        "Parsed using {method}. Raw text length: {} characters.",
        text.chars().count()
    )
}

/// (non-null, null) leaf counts of a serialized record.
fn count_leaves(value: &serde_json::Value) -> (usize, usize) {
    match value {
        serde_json::Value::Null => (0, 1),
        serde_json::Value::Object(map) => map.values().fold((0, 0), |acc, v| {
            let (p, e) = count_leaves(v);
            (acc.0 + p, acc.1 + e)
        }),
        _ => (1, 0),
    }
}
