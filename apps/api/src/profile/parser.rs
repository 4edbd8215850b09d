//! Heuristic profile parsing — raw resume text in, structured profile out.
//!
//! `parse` never fails: partial information always beats a hard error,
//! because the caller reviews and corrects the result before saving it.
//! Fields that found nothing stay `None`/empty with `Missing` confidence.

use super::contact;
use super::experience::{extract_education_entries, extract_work_entries};
use super::models::{CandidateProfile, Confidence, ContactBlock, ParseConfidence};
use super::sections::{segment, SectionKind, Segmented};
use super::vocab::{match_terms, Vocabulary};

/// Parses resume text with the built-in vocabulary.
pub fn parse(text: &str) -> CandidateProfile {
    parse_with_vocabulary(text, &Vocabulary::default())
}

/// Parses resume text against a caller-supplied vocabulary.
pub fn parse_with_vocabulary(text: &str, vocab: &Vocabulary) -> CandidateProfile {
    let segmented = segment(text);

    let name = contact::extract_name(text);
    let email = contact::extract_email(text);
    let phone = contact::extract_phone(text);
    let location = contact::extract_location(text);

    let work_history = segmented
        .body(SectionKind::Experience)
        .map(|body| extract_work_entries(&body))
        .unwrap_or_default();
    let education = segmented
        .body(SectionKind::Education)
        .map(|body| extract_education_entries(&body))
        .unwrap_or_default();

    let skills = match_terms(&field_domain(&segmented, SectionKind::Skills, text), vocab.skills);
    let certifications = match_terms(
        &field_domain(&segmented, SectionKind::Certifications, text),
        vocab.certifications,
    );
    let languages = match_terms(
        &field_domain(&segmented, SectionKind::Languages, text),
        vocab.languages,
    );
    let ehr_systems = match_terms(
        &field_domain(&segmented, SectionKind::EhrSystems, text),
        vocab.ehr_systems,
    );
    let programs = match_terms(
        &field_domain(&segmented, SectionKind::Programs, text),
        vocab.programs,
    );

    let confidence = ParseConfidence {
        name: presence(name.is_some(), Confidence::Low),
        email: presence(email.is_some(), Confidence::High),
        phone: presence(phone.is_some(), Confidence::High),
        location: presence(location.is_some(), Confidence::Low),
        work_history: entry_confidence(work_history.iter().map(|e| e.start_date.is_some())),
        education: entry_confidence(education.iter().map(|e| e.start_date.is_some())),
        skills: presence(!skills.is_empty(), Confidence::High),
        certifications: presence(!certifications.is_empty(), Confidence::High),
        languages: presence(!languages.is_empty(), Confidence::High),
        ehr_systems: presence(!ehr_systems.is_empty(), Confidence::High),
        programs: presence(!programs.is_empty(), Confidence::High),
    };

    let (first_name, last_name) = match name {
        Some((first, last)) => (Some(first), Some(last)),
        None => (None, None),
    };
    let (city, region) = match location {
        Some((city, region)) => (Some(city), Some(region)),
        None => (None, None),
    };

    CandidateProfile {
        contact: ContactBlock {
            first_name,
            last_name,
            email,
            phone,
            city,
            region,
        },
        work_history,
        education,
        skills,
        certifications,
        languages,
        ehr_systems,
        programs,
        confidence,
    }
}

/// Dictionary fields search their own section when one was recognized, and
/// fall back to the whole document otherwise — a headerless resume still
/// populates every dictionary-matched list.
fn field_domain(segmented: &Segmented, kind: SectionKind, full_text: &str) -> String {
    segmented
        .body(kind)
        .unwrap_or_else(|| full_text.to_string())
}

fn presence(found: bool, when_found: Confidence) -> Confidence {
    if found {
        when_found
    } else {
        Confidence::Missing
    }
}

/// Entries anchored by a date pattern are high-confidence; entries that only
/// a positional split produced are low.
fn entry_confidence(anchored: impl Iterator<Item = bool>) -> Confidence {
    let mut any = false;
    let mut any_anchored = false;
    for has_date in anchored {
        any = true;
        any_anchored |= has_date;
    }
    match (any, any_anchored) {
        (false, _) => Confidence::Missing,
        (true, false) => Confidence::Low,
        (true, true) => Confidence::High,
    }
}
