//! Field normalizers: raw captured text in, typed canonical values out.
//!
//! Normalizers never fail loudly. Anything that cannot be converted becomes
//! `None`, and shapes with a `raw` slot keep the original capture.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use super::vocabulary::{contains_term, fold_text, Vocabulary};
use crate::models::{NormalizedField, TemperatureMethod, TemperatureReading, TemperatureUnit};

/// Two-digit years below this land in the 2000s, the rest in the 1900s.
pub const PIVOT_YEAR: i32 = 50;

static NUMERIC_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,2})[/-](\d{1,2})[/-](\d{4}|\d{2})\b").expect("Invalid date regex")
});

static BLOOD_PRESSURE_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{2,3})\s*[/-]\s*(\d{2,3})\b").expect("Invalid blood pressure regex")
});

static LEADING_TEMPERATURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d+(?:\.\d+)?)(?:\s*°?\s*([FC])\b)?").expect("Invalid temperature regex")
});

/// Normalize a date-of-service capture to a calendar date.
///
/// Reads the first `M/D/Y` (or `M-D-Y`) group, falling back to `D/M/Y` when
/// the first number cannot be a month. Redacted or unparseable captures keep
/// `raw` with a `None` value.
pub fn normalize_date(raw: Option<&str>, vocab: &Vocabulary) -> NormalizedField<NaiveDate> {
    let Some(raw) = raw else {
        return NormalizedField::missing();
    };

    if vocab.is_redacted(raw) {
        tracing::debug!(field = "date_of_service", "Redacted date capture");
        return NormalizedField::rejected(raw);
    }

    match parse_numeric_date(raw) {
        Some(date) => NormalizedField::new(Some(date), Some(raw.to_string())),
        None => {
            tracing::debug!(field = "date_of_service", "No valid numeric date in capture");
            NormalizedField::rejected(raw)
        }
    }
}

/// Parse the first numeric date inside `text`. Invalid calendar dates
/// (e.g. 02/30) are rejected.
pub fn parse_numeric_date(text: &str) -> Option<NaiveDate> {
    let caps = NUMERIC_DATE.captures(text)?;
    let first: u32 = caps[1].parse().ok()?;
    let second: u32 = caps[2].parse().ok()?;
    let year_str = &caps[3];
    let year: i32 = year_str.parse().ok()?;
    let year = if year_str.len() == 2 {
        pivot_year(year)
    } else {
        year
    };

    let (month, day) = if first > 12 && second <= 12 {
        (second, first)
    } else {
        (first, second)
    };

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Expand a two-digit year around `PIVOT_YEAR`.
pub fn pivot_year(two_digit: i32) -> i32 {
    if two_digit < PIVOT_YEAR {
        2000 + two_digit
    } else {
        1900 + two_digit
    }
}

/// Canonical "systolic/diastolic" from the first 2–3 digit pair in `raw`.
pub fn normalize_blood_pressure(raw: &str) -> Option<String> {
    let caps = BLOOD_PRESSURE_PAIR.captures(raw)?;
    Some(format!("{}/{}", &caps[1], &caps[2]))
}

/// Parse a temperature capture such as `98.6 F oral` or `37.2C tympanic`.
///
/// The number must lead the capture. Unit is an optional F/C right after
/// it; method comes from keywords anywhere in the capture.
pub fn normalize_temperature(raw: Option<&str>, vocab: &Vocabulary) -> TemperatureReading {
    let Some(raw) = raw else {
        return TemperatureReading::default();
    };

    if vocab.is_redacted(raw) {
        tracing::debug!(field = "temperature", "Redacted temperature capture");
        return TemperatureReading::rejected(raw);
    }

    let parsed = LEADING_TEMPERATURE.captures(raw.trim()).and_then(|caps| {
        let value: f64 = caps[1].parse().ok()?;
        let unit = caps
            .get(2)
            .and_then(|m| m.as_str().chars().next())
            .and_then(TemperatureUnit::from_letter);
        Some((value, unit))
    });

    match parsed {
        Some((value, unit)) => TemperatureReading {
            value: Some(value),
            unit,
            method: temperature_method(raw, vocab),
            raw: Some(raw.to_string()),
        },
        None => {
            tracing::debug!(field = "temperature", "No leading numeric temperature");
            TemperatureReading::rejected(raw)
        }
    }
}

/// First configured method whose keyword appears as a whole word.
pub fn temperature_method(raw: &str, vocab: &Vocabulary) -> Option<TemperatureMethod> {
    let folded = fold_text(raw);
    vocab
        .temperature_methods
        .iter()
        .find(|entry| entry.keywords.iter().any(|kw| contains_term(&folded, kw)))
        .map(|entry| entry.method)
}

/// Tri-state signature check: `Some(true)` on an affirmative marker,
/// `Some(false)` on an explicit negative, `None` when the capture says
/// neither. Negative phrases are checked first since "unsigned" and
/// "no signature" contain affirmative words.
pub fn classify_signature(raw: Option<&str>, vocab: &Vocabulary) -> Option<bool> {
    let folded = fold_text(raw?);
    if folded.is_empty() {
        return None;
    }

    let any = |terms: &[String]| terms.iter().any(|t| contains_term(&folded, t));

    if any(vocab.signature_negative.as_slice()) {
        Some(false)
    } else if any(vocab.signature_affirmative.as_slice()) {
        Some(true)
    } else if any(vocab.signature_negative_glyphs.as_slice()) {
        Some(false)
    } else {
        None
    }
}

/// Whole-number vital (pulse, respiration).
pub fn normalize_count(raw: Option<&str>) -> Option<u32> {
    raw?.trim().parse().ok()
}
