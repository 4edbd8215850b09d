//! Curated term dictionaries for list-field extraction.
//!
//! The vocabularies are configuration data, versioned and kept apart from the
//! parser logic: the parser receives a `Vocabulary` value and never names a
//! term itself. Swapping or extending the tables requires no parser change.
//!
//! Matching is case-insensitive with word-boundary checks on both ends, so
//! the certification "RN" does not fire inside "learn". Hits are returned in
//! first-occurrence order with exact-string dedup.

/// Bump when the term tables change. Recorded for supportability, because a
/// profile parsed under one vocabulary can look different under another.
pub const VOCAB_VERSION: &str = "2025.08";

const SKILL_TERMS: &[&str] = &[
    "patient care",
    "care coordination",
    "care planning",
    "case management",
    "scheduling",
    "medical billing",
    "medical coding",
    "insurance verification",
    "prior authorization",
    "phlebotomy",
    "vital signs",
    "triage",
    "medication administration",
    "wound care",
    "charting",
    "data entry",
    "customer service",
    "front desk",
    "patient intake",
    "hipaa compliance",
    "hipaa",
    "cpr",
    "first aid",
];

const CERTIFICATION_TERMS: &[&str] = &[
    "RN",
    "LPN",
    "CNA",
    "CMA",
    "CCMA",
    "RMA",
    "CPhT",
    "BLS",
    "ACLS",
    "PALS",
    "NRP",
    "CPR certified",
    "Certified Nursing Assistant",
    "Licensed Practical Nurse",
    "Registered Nurse",
    "Certified Medical Assistant",
    "Medication Aide",
];

const LANGUAGE_TERMS: &[&str] = &[
    "English",
    "Spanish",
    "Hmong",
    "Somali",
    "French",
    "Mandarin",
    "Cantonese",
    "Vietnamese",
    "Russian",
    "Arabic",
    "Amharic",
    "Karen",
    "Oromo",
    "Portuguese",
    "Inglés",
    "Español",
];

const EHR_TERMS: &[&str] = &[
    "Epic",
    "Cerner",
    "Meditech",
    "Athenahealth",
    "eClinicalWorks",
    "NextGen",
    "Allscripts",
    "Kareo",
    "Practice Fusion",
    "Point Click Care",
    "PointClickCare",
    "MatrixCare",
];

const PROGRAM_TERMS: &[&str] = &[
    "Microsoft Excel",
    "Microsoft Word",
    "Microsoft Office",
    "Outlook",
    "PowerPoint",
    "Google Workspace",
    "Google Docs",
    "Salesforce",
    "QuickBooks",
    "Microsoft Teams",
    "Zoom",
    "Slack",
];

/// The per-field term tables the parser matches against.
#[derive(Debug, Clone, Copy)]
pub struct Vocabulary {
    pub skills: &'static [&'static str],
    pub certifications: &'static [&'static str],
    pub languages: &'static [&'static str],
    pub ehr_systems: &'static [&'static str],
    pub programs: &'static [&'static str],
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            skills: SKILL_TERMS,
            certifications: CERTIFICATION_TERMS,
            languages: LANGUAGE_TERMS,
            ehr_systems: EHR_TERMS,
            programs: PROGRAM_TERMS,
        }
    }
}

/// All terms found in `text`, canonical spelling, ordered by the byte offset
/// of their first occurrence, deduplicated by exact canonical string.
pub fn match_terms(text: &str, terms: &[&str]) -> Vec<String> {
    let haystack = text.to_lowercase();
    let mut hits: Vec<(usize, &str)> = Vec::new();

    for &term in terms {
        let needle = term.to_lowercase();
        if let Some(offset) = find_word_bounded(&haystack, &needle) {
            hits.push((offset, term));
        }
    }

    hits.sort_by_key(|&(offset, _)| offset);

    let mut out: Vec<String> = Vec::new();
    for (_, term) in hits {
        if !out.iter().any(|seen| seen == term) {
            out.push(term.to_string());
        }
    }
    out
}

/// First occurrence of `needle` in `haystack` where both ends land on a word
/// boundary (neighbouring char is not alphanumeric).
fn find_word_bounded(haystack: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() {
        return None;
    }
    let mut search_from = 0;
    while let Some(pos) = haystack[search_from..].find(needle) {
        let start = search_from + pos;
        let end = start + needle.len();

        let bounded_left = haystack[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let bounded_right = haystack[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());

        if bounded_left && bounded_right {
            return Some(start);
        }
        search_from = end;
    }
    None
}
