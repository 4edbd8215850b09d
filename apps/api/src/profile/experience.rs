//! Work-history and education entry extraction.
//!
//! Entries inside a section are split on blank lines or date-range
//! boundaries — a range token like `01/2022 – Present` strongly signals a
//! new entry. The first line with non-date content becomes the heading; a
//! comma splits it into `title, employer` (or `credential, institution`).

use once_cell::sync::Lazy;
use regex::Regex;

use super::models::{EducationEntry, WorkEntry};

const DATE_TOKEN: &str = r"(?:\d{1,2}/\d{4}|[A-Za-z]{3,9}\.?\s+\d{4}|\d{4})";
// Longest synonyms first: the alternation is leftmost-first, and a prefix
// match ("actual" inside "actualidad") would leave residue in the heading.
const PRESENT_TOKEN: &str = r"(?:presente|present|current|now|actualidad|actual)";

static DATE_RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)({DATE_TOKEN})\s*(?:[-–—]|\bto\b|\ba\b|\bhasta\b)\s*({DATE_TOKEN}|{PRESENT_TOKEN})"
    ))
    .unwrap()
});

static PRESENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"(?i)^{PRESENT_TOKEN}$")).unwrap());

/// Parses the experience-section body into work entries, in document order.
pub fn extract_work_entries(body: &str) -> Vec<WorkEntry> {
    split_entries(body)
        .iter()
        .filter_map(|lines| parse_work_entry(lines))
        .collect()
}

/// Parses the education-section body into education entries.
pub fn extract_education_entries(body: &str) -> Vec<EducationEntry> {
    split_entries(body)
        .iter()
        .filter_map(|lines| parse_education_entry(lines))
        .collect()
}

/// Groups section lines into entry blocks. A blank line always closes the
/// current block; a second date range inside one block opens a new one.
fn split_entries(body: &str) -> Vec<Vec<&str>> {
    let mut entries: Vec<Vec<&str>> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_has_date = false;

    for line in body.lines() {
        let line = line.trim();
        if line.is_empty() {
            if !current.is_empty() {
                entries.push(std::mem::take(&mut current));
                current_has_date = false;
            }
            continue;
        }

        let has_date = DATE_RANGE_RE.is_match(line);
        if has_date && current_has_date {
            entries.push(std::mem::take(&mut current));
            current_has_date = false;
        }
        current.push(line);
        current_has_date |= has_date;
    }
    if !current.is_empty() {
        entries.push(current);
    }
    entries
}

/// The entry's heading text: the first line with content left after the date
/// range (if any) is stripped.
fn heading_of(lines: &[&str]) -> Option<String> {
    for line in lines {
        let stripped = DATE_RANGE_RE.replace_all(line, "");
        let heading = stripped
            .trim_matches(|c: char| c.is_whitespace() || matches!(c, ',' | '-' | '–' | '—' | '|'));
        if !heading.is_empty() {
            return Some(heading.to_string());
        }
    }
    None
}

fn date_range_of(lines: &[&str]) -> Option<(String, String)> {
    lines.iter().find_map(|line| {
        DATE_RANGE_RE.captures(line).map(|caps| {
            (
                caps.get(1).map(|m| m.as_str().to_string()).unwrap_or_default(),
                caps.get(2).map(|m| m.as_str().to_string()).unwrap_or_default(),
            )
        })
    })
}

/// Splits a heading on its first comma; the tail keeps any further commas.
fn comma_split(heading: &str) -> (String, Option<String>) {
    match heading.split_once(',') {
        Some((head, tail)) if !tail.trim().is_empty() => {
            (head.trim().to_string(), Some(tail.trim().to_string()))
        }
        _ => (heading.trim().to_string(), None),
    }
}

fn parse_work_entry(lines: &[&str]) -> Option<WorkEntry> {
    let heading = heading_of(lines);
    let dates = date_range_of(lines);
    if heading.is_none() && dates.is_none() {
        return None;
    }

    let (title, employer) = match heading {
        Some(h) => {
            let (first, second) = comma_split(&h);
            (Some(first), second)
        }
        None => (None, None),
    };

    let (start_date, end_token) = match dates {
        Some((start, end)) => (Some(start), Some(end)),
        None => (None, None),
    };
    let current = end_token
        .as_deref()
        .map(|t| PRESENT_RE.is_match(t))
        .unwrap_or(false);
    let end_date = end_token.filter(|_| !current);

    Some(WorkEntry {
        employer,
        title,
        start_date,
        end_date,
        current,
    })
}

fn parse_education_entry(lines: &[&str]) -> Option<EducationEntry> {
    let heading = heading_of(lines);
    let dates = date_range_of(lines);
    if heading.is_none() && dates.is_none() {
        return None;
    }

    let (credential, institution) = match heading {
        Some(h) => {
            let (first, second) = comma_split(&h);
            match second {
                // "Credential, Institution"
                Some(inst) => (Some(first), Some(inst)),
                // A lone heading is more likely the school than the credential.
                None => (None, Some(first)),
            }
        }
        None => (None, None),
    };

    let (start_date, end_date) = match dates {
        Some((start, end)) => {
            let end = if PRESENT_RE.is_match(&end) { None } else { Some(end) };
            (Some(start), end)
        }
        None => (None, None),
    };

    Some(EducationEntry {
        institution,
        credential,
        start_date,
        end_date,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_line_yields_full_entry() {
        let entries = extract_work_entries("Care Coordinator, Example Clinic, 01/2022 – Present");
        assert_eq!(entries.len(), 1);
        let e = &entries[0];
        assert_eq!(e.title.as_deref(), Some("Care Coordinator"));
        assert_eq!(e.employer.as_deref(), Some("Example Clinic"));
        assert_eq!(e.start_date.as_deref(), Some("01/2022"));
        assert_eq!(e.end_date, None);
        assert!(e.current);
    }

    #[test]
    fn test_year_range_to_present() {
        let entries = extract_work_entries("Medical Assistant\n2019–Present");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title.as_deref(), Some("Medical Assistant"));
        assert_eq!(entries[0].start_date.as_deref(), Some("2019"));
        assert!(entries[0].current);
    }

    #[test]
    fn test_blank_line_separates_entries() {
        let body = "Care Coordinator, Example Clinic\n01/2022 – Present\n\nScheduler, Other Clinic\n03/2019 – 12/2021";
        let entries = extract_work_entries(body);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].employer.as_deref(), Some("Example Clinic"));
        assert_eq!(entries[1].employer.as_deref(), Some("Other Clinic"));
        assert_eq!(entries[1].end_date.as_deref(), Some("12/2021"));
        assert!(!entries[1].current);
    }

    #[test]
    fn test_second_date_range_opens_new_entry() {
        let body = "Care Coordinator, Example Clinic, 01/2022 – Present\nScheduler, Other Clinic, 03/2019 – 12/2021";
        let entries = extract_work_entries(body);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title.as_deref(), Some("Care Coordinator"));
        assert_eq!(entries[1].title.as_deref(), Some("Scheduler"));
    }

    #[test]
    fn test_month_name_range() {
        let entries = extract_work_entries("Receptionist, Front Desk Co\nJune 2019 to March 2021");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].start_date.as_deref(), Some("June 2019"));
        assert_eq!(entries[0].end_date.as_deref(), Some("March 2021"));
    }

    #[test]
    fn test_spanish_present_synonym_sets_current() {
        let entries = extract_work_entries("Coordinadora, Clínica Ejemplo, 05/2020 a actualidad");
        assert_eq!(entries.len(), 1);
        assert!(entries[0].current);
        assert_eq!(entries[0].end_date, None);
    }

    #[test]
    fn test_heading_without_comma_is_title_only() {
        let entries = extract_work_entries("Care Coordinator\n01/2022 – Present");
        assert_eq!(entries[0].title.as_deref(), Some("Care Coordinator"));
        assert_eq!(entries[0].employer, None);
    }

    #[test]
    fn test_empty_section_yields_no_entries() {
        assert!(extract_work_entries("").is_empty());
        assert!(extract_work_entries("\n\n").is_empty());
    }

    #[test]
    fn test_education_credential_and_institution() {
        let entries =
            extract_education_entries("Associate of Science in Nursing, Example College\n2017 – 2019");
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].credential.as_deref(),
            Some("Associate of Science in Nursing")
        );
        assert_eq!(entries[0].institution.as_deref(), Some("Example College"));
        assert_eq!(entries[0].start_date.as_deref(), Some("2017"));
        assert_eq!(entries[0].end_date.as_deref(), Some("2019"));
    }

    #[test]
    fn test_education_lone_heading_is_institution() {
        let entries = extract_education_entries("Example High School");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].institution.as_deref(), Some("Example High School"));
        assert_eq!(entries[0].credential, None);
    }
}
