//! Parser output models.
//!
//! Every list field is insertion-ordered and may be empty. `Option<String>`
//! distinguishes unknown (`None`) from confirmed-blank (`Some("")`): a parser
//! that found nothing must not invent an empty string.

use serde::{Deserialize, Serialize};

/// Per-field certainty tag driving caller-side review prompts.
///
/// Heuristic parsing produces uneven certainty across fields — an email regex
/// match is trustworthy, a positional name guess is not — so confidence is
/// per-field, not one scalar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    /// An anchored pattern or dictionary match fired.
    High,
    /// Only a positional/heuristic rule fired.
    Low,
    /// No matcher fired.
    #[default]
    Missing,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParseConfidence {
    pub name: Confidence,
    pub email: Confidence,
    pub phone: Confidence,
    pub location: Confidence,
    pub work_history: Confidence,
    pub education: Confidence,
    pub skills: Confidence,
    pub certifications: Confidence,
    pub languages: Confidence,
    pub ehr_systems: Confidence,
    pub programs: Confidence,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactBlock {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkEntry {
    pub employer: Option<String>,
    pub title: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    /// Set when the end-date token is a "present/current" synonym.
    pub current: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub institution: Option<String>,
    pub credential: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Structured candidate profile produced by one parse.
///
/// Created fresh per upload, edited by the caller outside this core, and
/// handed whole to the store as an immutable snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub contact: ContactBlock,
    pub work_history: Vec<WorkEntry>,
    pub education: Vec<EducationEntry>,
    pub skills: Vec<String>,
    pub certifications: Vec<String>,
    pub languages: Vec<String>,
    pub ehr_systems: Vec<String>,
    pub programs: Vec<String>,
    pub confidence: ParseConfidence,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&Confidence::High).unwrap(),
            r#""high""#
        );
        assert_eq!(
            serde_json::to_string(&Confidence::Missing).unwrap(),
            r#""missing""#
        );
    }

    #[test]
    fn test_default_profile_is_empty_and_all_missing() {
        let profile = CandidateProfile::default();
        assert!(profile.work_history.is_empty());
        assert!(profile.skills.is_empty());
        assert_eq!(profile.confidence.email, Confidence::Missing);
        assert_eq!(profile.contact.first_name, None);
    }

    #[test]
    fn test_profile_roundtrips_through_json() {
        let mut profile = CandidateProfile::default();
        profile.contact.email = Some("jane.doe@example.org".to_string());
        profile.confidence.email = Confidence::High;
        profile.skills.push("care coordination".to_string());

        let json = serde_json::to_string(&profile).unwrap();
        let back: CandidateProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, profile);
    }

    #[test]
    fn test_unknown_distinct_from_confirmed_blank() {
        let unknown = ContactBlock::default();
        let blank = ContactBlock {
            city: Some(String::new()),
            ..ContactBlock::default()
        };
        assert_ne!(unknown, blank);
    }
}
