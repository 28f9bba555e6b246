//! Single-value field extraction driven by a pattern table.
//!
//! Each `FieldRule` owns one regex whose first capture group is the field
//! value. Patterns are compiled case-insensitive and multi-line (`$` is a
//! line end, `\A` the start of the text). First occurrence wins: visit forms
//! are single-page, so a second match is almost always a label echo.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use super::ConfigError;

/// Value after a label: same line, or the next line when the label ends its
/// own line. The value never starts with whitespace or the label colon.
macro_rules! after_label {
    ($label:literal, $tail:literal) => {
        concat!($label, r"[ \t]*(?:\r?\n[ \t]*)?([^\s:]", $tail)
    };
}

/// Single-cell capture: stops at a column gap of two or more spaces/tabs,
/// which is how OCR lays out side-by-side form cells.
macro_rules! cell {
    ($label:literal) => {
        after_label!($label, r"[^\n\r]*?)(?:[ \t]{2,}|\r|$)")
    };
}

/// Whole-line capture, for fields whose value may itself contain wide gaps.
macro_rules! full_line {
    ($label:literal) => {
        after_label!($label, r"[^\n\r]*)")
    };
}

/// Every scalar field the structurer reads from a visit form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldRule {
    DocType,
    LocationOfCare,
    DateOfService,
    VisitType,
    PatientName,
    BloodPressure,
    PulseRate,
    RespRate,
    Temperature,
    ChiefComplaint,
    Impression,
    StaffName,
    Signature,
}

impl FieldRule {
    pub const ALL: [FieldRule; 13] = [
        FieldRule::DocType,
        FieldRule::LocationOfCare,
        FieldRule::DateOfService,
        FieldRule::VisitType,
        FieldRule::PatientName,
        FieldRule::BloodPressure,
        FieldRule::PulseRate,
        FieldRule::RespRate,
        FieldRule::Temperature,
        FieldRule::ChiefComplaint,
        FieldRule::Impression,
        FieldRule::StaffName,
        FieldRule::Signature,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FieldRule::DocType => "doc_type",
            FieldRule::LocationOfCare => "location_of_care",
            FieldRule::DateOfService => "date_of_service",
            FieldRule::VisitType => "visit_type",
            FieldRule::PatientName => "patient_name",
            FieldRule::BloodPressure => "blood_pressure",
            FieldRule::PulseRate => "pulse_rate",
            FieldRule::RespRate => "resp_rate",
            FieldRule::Temperature => "temperature",
            FieldRule::ChiefComplaint => "chief_complaint",
            FieldRule::Impression => "impression_or_diagnosis",
            FieldRule::StaffName => "staff_name",
            FieldRule::Signature => "signature",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|rule| rule.name() == name)
    }

    /// Built-in pattern source for this field.
    pub fn default_pattern(self) -> &'static str {
        match self {
            FieldRule::DocType => {
                r"\A\s*([^\n\r]*\b(?:form|note|document)\b[^\n\r]*)"
            }
            FieldRule::LocationOfCare => cell!(r"location\s+of\s+care\s*:?"),
            FieldRule::DateOfService => cell!(r"date\s+of\s+service\s*:?"),
            FieldRule::VisitType => cell!(r"visit\s+type\s*:?"),
            // Not cut at column gaps: the symptom guard must see the whole line.
            FieldRule::PatientName => full_line!(r"patient\s+name\s*:?"),
            FieldRule::BloodPressure => cell!(r"(?:blood\s+pressure|\bBP\b)\s*:?"),
            FieldRule::PulseRate => r"pulse\s+rate\s*:?\s*(\d{1,3})(?:\D|$)",
            FieldRule::RespRate => r"resp(?:iratory|\.)?\s+rate\s*:?\s*(\d{1,3})(?:\D|$)",
            FieldRule::Temperature => {
                full_line!(r"\btemp(?:erature)?\b\s*(?:/\s*)?(?:method\b)?\s*:?")
            }
            FieldRule::ChiefComplaint => r"chief\s+complaint\s*:?\s*([^\s:][^\n\r]*)",
            FieldRule::Impression => {
                r"impression\s*(?:/|or|and)?\s*diagnosis\s*:?\s*([^\s:][^\n\r]*)"
            }
            FieldRule::StaffName => cell!(r"clinical\s+staff\s*\(\s*print\s+name\s*\)\s*:?"),
            FieldRule::Signature => cell!(r"clinical\s+staff\s+signature\s*:?"),
        }
    }
}

/// A named, compiled extraction rule.
#[derive(Debug, Clone)]
pub struct FieldPattern {
    name: String,
    regex: Regex,
}

impl FieldPattern {
    pub fn new(name: impl Into<String>, source: &str) -> Result<Self, ConfigError> {
        let name = name.into();
        let regex = RegexBuilder::new(source)
            .case_insensitive(true)
            .multi_line(true)
            .build()
            .map_err(|source| ConfigError::InvalidPattern {
                name: name.clone(),
                source,
            })?;
        Ok(Self { name, regex })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

/// First capture group of the first match, trimmed. `None` when nothing
/// matched or the group captured only whitespace.
pub fn extract_field(text: &str, pattern: &FieldPattern) -> Option<String> {
    let caps = pattern.regex.captures(text)?;
    let value = caps.get(1)?.as_str().trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

static BUILTIN_TABLE: LazyLock<FieldTable> = LazyLock::new(|| FieldTable {
    patterns: FieldRule::ALL
        .into_iter()
        .map(|rule| {
            FieldPattern::new(rule.name(), rule.default_pattern())
                .expect("Invalid built-in field pattern")
        })
        .collect(),
});

/// Compiled patterns for every `FieldRule`, indexed in `FieldRule::ALL` order.
#[derive(Debug, Clone)]
pub struct FieldTable {
    patterns: Vec<FieldPattern>,
}

impl FieldTable {
    pub fn builtin() -> &'static FieldTable {
        &BUILTIN_TABLE
    }

    /// Built-in table with some patterns replaced, keyed by `FieldRule::name`.
    pub fn with_overrides(overrides: &BTreeMap<String, String>) -> Result<Self, ConfigError> {
        let mut table = Self::builtin().clone();
        for (name, source) in overrides {
            let rule =
                FieldRule::from_name(name).ok_or_else(|| ConfigError::UnknownField(name.clone()))?;
            table.patterns[rule as usize] = FieldPattern::new(rule.name(), source)?;
        }
        Ok(table)
    }

    pub fn pattern(&self, rule: FieldRule) -> &FieldPattern {
        &self.patterns[rule as usize]
    }

    pub fn extract(&self, text: &str, rule: FieldRule) -> Option<String> {
        let value = extract_field(text, self.pattern(rule));
        if value.is_none() {
            tracing::debug!(field = rule.name(), "No match for field pattern");
        }
        value
    }
}
