//! Bounded section extraction: lists, free-text blocks, per-system statuses.
//!
//! A section starts right after its header and runs to the first stop marker
//! (a checkbox glyph or the next known header) or the end of the text.

use std::sync::LazyLock;

use regex::Regex;

use super::vocabulary::Vocabulary;
use crate::models::{ReviewOfSystems, ReviewSystem};

/// Checkbox glyphs that terminate free-text sections on the scanned form.
const SECTION_GLYPHS: &[char] = &['☐', '☑', '□', '✓', '✔'];

/// Where a section ends.
#[derive(Debug)]
pub enum StopMarker {
    Glyph(char),
    Keyword(Regex),
}

#[derive(Debug)]
pub struct SectionRule {
    pub name: &'static str,
    start: Regex,
    stops: Vec<StopMarker>,
}

impl SectionRule {
    fn new(name: &'static str, start: &str, glyph_stops: bool, keyword_stops: &[&str]) -> Self {
        let mut stops: Vec<StopMarker> = Vec::new();
        if glyph_stops {
            stops.extend(SECTION_GLYPHS.iter().copied().map(StopMarker::Glyph));
        }
        stops.extend(
            keyword_stops
                .iter()
                .map(|kw| StopMarker::Keyword(ci_regex(kw))),
        );
        Self {
            name,
            start: ci_regex(start),
            stops,
        }
    }

    /// Earliest stop position in `body`, or its length.
    fn stop_offset(&self, body: &str) -> usize {
        self.stops
            .iter()
            .filter_map(|stop| match stop {
                StopMarker::Glyph(glyph) => body.find(*glyph),
                StopMarker::Keyword(regex) => regex.find(body).map(|m| m.start()),
            })
            .min()
            .unwrap_or(body.len())
    }
}

/// The bounded sections of a visit form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    MedicationsAdded,
    MedicationsDeleted,
    NewAllergies,
    Hpi,
    ReviewOfSystems,
}

static MEDICATIONS_ADDED: LazyLock<SectionRule> = LazyLock::new(|| {
    SectionRule::new(
        "medications_added",
        r"medications?\s+added\s*/?\s*(?:or\s+)?changed\s*:?",
        true,
        &[r"medications?\s+deleted", r"\ballerg(?:y|ies)\b"],
    )
});

static MEDICATIONS_DELETED: LazyLock<SectionRule> = LazyLock::new(|| {
    SectionRule::new(
        "medications_deleted",
        r"medications?\s+deleted\s*:?",
        true,
        &[r"\ballerg(?:y|ies)\b", r"clinical\s+staff", r"chief\s+complaint"],
    )
});

static NEW_ALLERGIES: LazyLock<SectionRule> = LazyLock::new(|| {
    SectionRule::new(
        "new_allergies",
        r"new\s+allerg(?:y|ies)\s*:?",
        true,
        &[r"clinical\s+staff", r"chief\s+complaint"],
    )
});

static HPI: LazyLock<SectionRule> = LazyLock::new(|| {
    SectionRule::new(
        "hpi",
        r"\bhpi\b\s*:?",
        true,
        &[r"review\s+of\s+systems", r"impression"],
    )
});

// ROS lines carry their own checkboxes, so only the next header ends it.
static REVIEW_OF_SYSTEMS: LazyLock<SectionRule> = LazyLock::new(|| {
    SectionRule::new(
        "review_of_systems",
        r"review\s+of\s+systems\s*:?",
        false,
        &[r"impression"],
    )
});

impl SectionKind {
    pub fn rule(self) -> &'static SectionRule {
        match self {
            SectionKind::MedicationsAdded => &MEDICATIONS_ADDED,
            SectionKind::MedicationsDeleted => &MEDICATIONS_DELETED,
            SectionKind::NewAllergies => &NEW_ALLERGIES,
            SectionKind::Hpi => &HPI,
            SectionKind::ReviewOfSystems => &REVIEW_OF_SYSTEMS,
        }
    }
}

/// Trimmed body of the first occurrence of `rule` in `text`.
/// `None` when the header is absent or the body is blank.
pub fn extract_section<'t>(text: &'t str, rule: &SectionRule) -> Option<&'t str> {
    let header = rule.start.find(text)?;
    let rest = &text[header.end()..];
    let body = rest[..rule.stop_offset(rest)].trim();
    if body.is_empty() {
        tracing::debug!(section = rule.name, "Section header found with empty body");
        None
    } else {
        Some(body)
    }
}

/// Split a section body into one entry per line.
///
/// Blank, redacted and repeated lines are dropped (first occurrence kept,
/// case and order preserved). A body that is only "N/A" is `None`, not a
/// one-element list.
pub fn split_list(body: &str, vocab: &Vocabulary) -> Option<Vec<String>> {
    if vocab.is_not_applicable(body) {
        return None;
    }

    let mut items: Vec<String> = Vec::new();
    for line in body.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if vocab.is_redacted(line) {
            tracing::debug!("Redacted list entry dropped");
            continue;
        }
        if !items.iter().any(|existing| existing == line) {
            items.push(line.to_string());
        }
    }

    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

/// Free-text section body, with "N/A" and redacted bodies collapsed to `None`.
pub fn section_text(body: &str, vocab: &Vocabulary) -> Option<String> {
    if vocab.is_not_applicable(body) || vocab.is_redacted(body) {
        None
    } else {
        Some(body.to_string())
    }
}

static SYSTEM_LINES: LazyLock<Vec<(ReviewSystem, Regex)>> = LazyLock::new(|| {
    ReviewSystem::ALL
        .into_iter()
        .map(|system| {
            let pattern = format!(r"(?m)\b{}\s*:[ \t]*([^\n\r]*)", system.as_str());
            (system, ci_regex(&pattern))
        })
        .collect()
});

/// Status for each fixed review-of-systems entry.
///
/// For each system the first word after `Name:` that the synonym table
/// recognizes decides the status; checkboxes and unreadable words are
/// skipped. Falls back to the whole text when the form has no
/// "Review of Systems" header.
pub fn classify_systems(text: &str, vocab: &Vocabulary) -> ReviewOfSystems {
    let scope = extract_section(text, SectionKind::ReviewOfSystems.rule()).unwrap_or(text);
    let mut ros = ReviewOfSystems::default();

    for (system, line_regex) in SYSTEM_LINES.iter() {
        let status = line_regex
            .captures(scope)
            .and_then(|caps| caps.get(1))
            .and_then(|line| {
                line.as_str()
                    .split(|c: char| !c.is_alphabetic())
                    .filter(|token| !token.is_empty())
                    .find_map(|token| vocab.classify_status(token))
            });
        ros.set(*system, status);
    }

    ros
}

/// Which "unchanged from summary" checkbox to look for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryFlag {
    Medications,
    Allergies,
}

static MEDICATIONS_UNCHANGED: LazyLock<Regex> = LazyLock::new(|| {
    ci_regex(r"medications?\s*:\s*unchanged\s+from\s+(?:attached\s+)?(?:chart\s+)?summary")
});

static ALLERGIES_UNCHANGED: LazyLock<Regex> = LazyLock::new(|| {
    ci_regex(
        r"allerg(?:y|ies)\s*[☐☑□✓✔]?\s*:?\s*unchanged\s+from\s+(?:attached\s+)?(?:chart\s+)?summary",
    )
});

/// `Some(true)` when the form carries the "unchanged from summary" phrase,
/// `None` otherwise. Independent of the list sections.
pub fn detect_unchanged(text: &str, flag: SummaryFlag) -> Option<bool> {
    let regex = match flag {
        SummaryFlag::Medications => &MEDICATIONS_UNCHANGED,
        SummaryFlag::Allergies => &ALLERGIES_UNCHANGED,
    };
    regex.is_match(text).then_some(true)
}

fn ci_regex(pattern: &str) -> Regex {
    Regex::new(&format!("(?i){pattern}")).expect("Invalid section regex pattern")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SystemStatus;

    fn vocab() -> Vocabulary {
        Vocabulary::default()
    }

    #[test]
    fn section_stops_at_next_header() {
        let text = "Medications Added/Changed\nAlbuterol\nMedications Deleted\nLisinopril\nAllergies";
        assert_eq!(
            extract_section(text, SectionKind::MedicationsAdded.rule()),
            Some("Albuterol")
        );
        assert_eq!(
            extract_section(text, SectionKind::MedicationsDeleted.rule()),
            Some("Lisinopril")
        );
    }

    #[test]
    fn section_stops_at_glyph() {
        let text = "Medications Deleted\nLisinopril\nMetoprolol ☐ Unchanged";
        assert_eq!(
            extract_section(text, SectionKind::MedicationsDeleted.rule()),
            Some("Lisinopril\nMetoprolol")
        );
    }

    #[test]
    fn section_runs_to_end_of_text() {
        let text = "HPI\nWheezing\nCough";
        assert_eq!(
            extract_section(text, SectionKind::Hpi.rule()),
            Some("Wheezing\nCough")
        );
    }

    #[test]
    fn missing_or_empty_section_is_none() {
        assert_eq!(extract_section("nothing here", SectionKind::Hpi.rule()), None);
        assert_eq!(
            extract_section("HPI\n   \nReview of Systems", SectionKind::Hpi.rule()),
            None
        );
    }

    #[test]
    fn split_list_trims_and_dedupes() {
        let list = split_list("  Albuterol \n\nCough\nAlbuterol\n  \nalbuterol", &vocab()).unwrap();
        assert_eq!(list, vec!["Albuterol", "Cough", "albuterol"]);
    }

    #[test]
    fn split_list_not_applicable_collapses() {
        assert_eq!(split_list("N/A", &vocab()), None);
        assert_eq!(split_list("n/a", &vocab()), None);
        assert_eq!(split_list(" \n ", &vocab()), None);
    }

    #[test]
    fn split_list_drops_redacted_entries() {
        let list = split_list("[redacted]\nCough\n[REDACTED] inhaler", &vocab()).unwrap();
        assert_eq!(list, vec!["Cough"]);
        assert_eq!(split_list("[redacted]\n[redacted]", &vocab()), None);
    }

    #[test]
    fn section_text_redacted_collapses() {
        assert_eq!(section_text("Penicillin [redacted]", &vocab()), None);
    }

    #[test]
    fn section_text_not_applicable_collapses() {
        assert_eq!(section_text("N/A", &vocab()), None);
        assert_eq!(section_text("Penicillin - rash", &vocab()).as_deref(), Some("Penicillin - rash"));
    }

    #[test]
    fn classify_systems_maps_synonyms() {
        let text = "Review of Systems\nGeneral: Unremarkable\nChest: Positive\nEyes: ☐ negative\nImpression: none";
        let ros = classify_systems(text, &vocab());
        assert_eq!(ros.general, Some(SystemStatus::Unremarkable));
        assert_eq!(ros.chest, Some(SystemStatus::Abnormal));
        assert_eq!(ros.eyes, Some(SystemStatus::Unremarkable));
        assert_eq!(ros.ent, None);
        assert_eq!(ros.neck, None);
        assert_eq!(ros.head, None);
    }

    #[test]
    fn classify_systems_skips_unreadable_words() {
        let text = "Review of Systems\nGeneral: □ Rureallale  □ Unremarkable\nENT: □ Unremakable";
        let ros = classify_systems(text, &vocab());
        assert_eq!(ros.general, Some(SystemStatus::Unremarkable));
        assert_eq!(ros.ent, Some(SystemStatus::Unremarkable));
    }

    #[test]
    fn abnormal_is_not_read_as_normal() {
        let ros = classify_systems("Neck: Abnormal\nHead: remarkable", &vocab());
        assert_eq!(ros.neck, Some(SystemStatus::Abnormal));
        assert_eq!(ros.head, Some(SystemStatus::Abnormal));
    }

    #[test]
    fn classify_systems_without_header_scans_whole_text() {
        let ros = classify_systems("General: Unremarkable", &vocab());
        assert_eq!(ros.general, Some(SystemStatus::Unremarkable));
        assert_eq!(ros.chest, None);
    }

    #[test]
    fn system_names_need_word_boundary() {
        // "Patient:" must not be read as the ENT system
        let ros = classify_systems("Patient: normal", &vocab());
        assert_eq!(ros.ent, None);
    }

    #[test]
    fn status_on_unrelated_line_is_ignored() {
        let ros = classify_systems("General: deferred\nnormal", &vocab());
        assert_eq!(ros.general, None);
    }

    #[test]
    fn detect_unchanged_flags() {
        let text = "☐ Medications: Unchanged from attached Chart Summary\nAllergies\n☐ Unchanged from attached Summary";
        assert_eq!(detect_unchanged(text, SummaryFlag::Medications), Some(true));
        assert_eq!(detect_unchanged(text, SummaryFlag::Allergies), Some(true));
        assert_eq!(detect_unchanged("Medications Added", SummaryFlag::Medications), None);
        assert_eq!(detect_unchanged("", SummaryFlag::Allergies), None);
    }
}
