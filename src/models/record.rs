use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::enums::{ReviewSystem, SystemStatus, TemperatureMethod, TemperatureUnit};

/// A derived value next to the text it was derived from.
///
/// `raw` is kept whenever something was captured, even if `value` was
/// rejected by a normalizer or a guard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedField<T> {
    pub value: Option<T>,
    pub raw: Option<String>,
}

impl<T> NormalizedField<T> {
    pub fn new(value: Option<T>, raw: Option<String>) -> Self {
        Self { value, raw }
    }

    /// Nothing captured at all.
    pub fn missing() -> Self {
        Self {
            value: None,
            raw: None,
        }
    }

    /// Captured, but no usable value could be derived.
    pub fn rejected(raw: impl Into<String>) -> Self {
        Self {
            value: None,
            raw: Some(raw.into()),
        }
    }
}

impl<T> Default for NormalizedField<T> {
    fn default() -> Self {
        Self::missing()
    }
}

/// Temperature reading: a `NormalizedField` widened with unit and method.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemperatureReading {
    pub value: Option<f64>,
    pub unit: Option<TemperatureUnit>,
    pub method: Option<TemperatureMethod>,
    pub raw: Option<String>,
}

impl TemperatureReading {
    pub fn rejected(raw: impl Into<String>) -> Self {
        Self {
            raw: Some(raw.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    /// Canonical "systolic/diastolic".
    pub blood_pressure: Option<String>,
    pub pulse_rate: Option<u32>,
    pub resp_rate: Option<u32>,
    pub temperature: TemperatureReading,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Medications {
    pub unchanged_from_summary: Option<bool>,
    pub added_or_changed: Option<Vec<String>>,
    pub deleted: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Allergies {
    pub unchanged_from_summary: Option<bool>,
    pub new_allergies: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClinicalStaff {
    pub printed_name: Option<String>,
    /// Tri-state: `None` means the form gave no evidence either way.
    pub signature_present: Option<bool>,
}

/// History of present illness.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hpi {
    pub symptoms_checked: Option<Vec<String>>,
    pub free_text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewOfSystems {
    pub general: Option<SystemStatus>,
    pub ent: Option<SystemStatus>,
    pub neck: Option<SystemStatus>,
    pub head: Option<SystemStatus>,
    pub eyes: Option<SystemStatus>,
    pub chest: Option<SystemStatus>,
}

impl ReviewOfSystems {
    pub fn get(&self, system: ReviewSystem) -> Option<SystemStatus> {
        *self.slot(system)
    }

    pub fn set(&mut self, system: ReviewSystem, status: Option<SystemStatus>) {
        *self.slot_mut(system) = status;
    }

    fn slot(&self, system: ReviewSystem) -> &Option<SystemStatus> {
        match system {
            ReviewSystem::General => &self.general,
            ReviewSystem::Ent => &self.ent,
            ReviewSystem::Neck => &self.neck,
            ReviewSystem::Head => &self.head,
            ReviewSystem::Eyes => &self.eyes,
            ReviewSystem::Chest => &self.chest,
        }
    }

    fn slot_mut(&mut self, system: ReviewSystem) -> &mut Option<SystemStatus> {
        match system {
            ReviewSystem::General => &mut self.general,
            ReviewSystem::Ent => &mut self.ent,
            ReviewSystem::Neck => &mut self.neck,
            ReviewSystem::Head => &mut self.head,
            ReviewSystem::Eyes => &mut self.eyes,
            ReviewSystem::Chest => &mut self.chest,
        }
    }
}

/// Structured record for one visit form.
///
/// Every key serializes on every record; missing evidence is an explicit
/// `null`. Downstream storage and insight generation depend on these names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalRecord {
    pub doc_type: String,
    pub location_of_care: Option<String>,
    pub date_of_service: NormalizedField<NaiveDate>,
    pub visit_type: Option<String>,
    pub patient_name: NormalizedField<String>,
    pub vitals: Vitals,
    pub medications: Medications,
    pub allergies: Allergies,
    pub clinical_staff: ClinicalStaff,
    pub chief_complaint: Option<String>,
    pub hpi: Hpi,
    pub review_of_systems: ReviewOfSystems,
    pub impression_or_diagnosis: Option<String>,
    pub source_quality_notes: String,
}

impl MedicalRecord {
    /// Pretty JSON with non-ASCII glyphs left as-is.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_field_serializes_both_keys() {
        let field: NormalizedField<String> = NormalizedField::rejected("[redacted]");
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json, serde_json::json!({"value": null, "raw": "[redacted]"}));
    }

    #[test]
    fn date_value_serializes_iso() {
        let field = NormalizedField::new(
            NaiveDate::from_ymd_opt(2024, 2, 14),
            Some("02/14/24".to_string()),
        );
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["value"], "2024-02-14");
    }

    #[test]
    fn empty_temperature_keeps_all_keys() {
        let json = serde_json::to_value(TemperatureReading::default()).unwrap();
        let obj = json.as_object().unwrap();
        for key in ["value", "unit", "method", "raw"] {
            assert!(obj.contains_key(key), "missing key {key}");
            assert!(obj[key].is_null());
        }
    }

    #[test]
    fn review_of_systems_get_set() {
        let mut ros = ReviewOfSystems::default();
        ros.set(ReviewSystem::Chest, Some(SystemStatus::Abnormal));
        assert_eq!(ros.get(ReviewSystem::Chest), Some(SystemStatus::Abnormal));
        assert_eq!(ros.get(ReviewSystem::General), None);

        let json = serde_json::to_value(&ros).unwrap();
        assert_eq!(json["chest"], "abnormal");
        assert!(json["general"].is_null());
    }
}
