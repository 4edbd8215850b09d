//! Contact extraction — anchored email/phone patterns plus positional
//! heuristics for name and location.
//!
//! Anchored matches are high-confidence; the name and location rules are
//! positional guesses and stay low-confidence so the caller reviews them.

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z0-9][A-Za-z0-9._%+-]*@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap()
});

/// North-American digit runs with optional separators and country code.
static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+?1[\s.\-]?)?\(?\d{3}\)?[\s.\-]?\d{3}[\s.\-]?\d{4}").unwrap()
});

/// A `City, ST` line, optionally with a trailing ZIP.
static LOCATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z][A-Za-z .'\-]*?),\s*([A-Z]{2})(?:\s+\d{5}(?:-\d{4})?)?$").unwrap()
});

const MAX_NAME_CHARS: usize = 60;
const NAME_WORD_RANGE: std::ops::RangeInclusive<usize> = 2..=4;

/// First email-shaped token anywhere in the text.
pub fn extract_email(text: &str) -> Option<String> {
    EMAIL_RE.find(text).map(|m| m.as_str().to_string())
}

/// Whether `candidate` is, in its entirety, an email-shaped token.
/// Used by the save endpoint's schema validation.
pub fn is_email_shaped(candidate: &str) -> bool {
    let candidate = candidate.trim();
    EMAIL_RE
        .find(candidate)
        .map_or(false, |m| m.start() == 0 && m.end() == candidate.len())
}

/// First phone-shaped digit run anywhere in the text.
pub fn extract_phone(text: &str) -> Option<String> {
    PHONE_RE.find(text).map(|m| m.as_str().trim().to_string())
}

/// Positional name heuristic: the first line that contains no digits, no
/// email or phone pattern, doesn't look like a section header, and falls
/// within a plausible name length and word count. Returns (first, last).
pub fn extract_name(text: &str) -> Option<(String, String)> {
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if !is_plausible_name(line) {
            continue;
        }

        let mut words = line.split_whitespace();
        let first = words.next()?.to_string();
        let last = words.collect::<Vec<_>>().join(" ");
        return Some((first, last));
    }
    None
}

fn is_plausible_name(line: &str) -> bool {
    if line.len() > MAX_NAME_CHARS || line.ends_with(':') {
        return false;
    }
    if line.chars().any(|c| c.is_ascii_digit()) || line.contains('@') {
        return false;
    }
    if PHONE_RE.is_match(line) || EMAIL_RE.is_match(line) {
        return false;
    }
    NAME_WORD_RANGE.contains(&line.split_whitespace().count())
}

/// `City, ST` line heuristic. Returns (city, region).
pub fn extract_location(text: &str) -> Option<(String, String)> {
    for line in text.lines() {
        if let Some(caps) = LOCATION_RE.captures(line.trim()) {
            let city = caps.get(1)?.as_str().trim().to_string();
            let region = caps.get(2)?.as_str().to_string();
            return Some((city, region));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = "Jane Doe\njane.doe@example.org\n(555) 123-4567\nExperience:\nCare Coordinator, Example Clinic, 01/2022 – Present";

    #[test]
    fn test_email_extracted_from_fixture() {
        assert_eq!(
            extract_email(FIXTURE),
            Some("jane.doe@example.org".to_string())
        );
    }

    #[test]
    fn test_phone_extracted_from_fixture() {
        assert_eq!(extract_phone(FIXTURE), Some("(555) 123-4567".to_string()));
    }

    #[test]
    fn test_is_email_shaped_accepts_whole_token_only() {
        assert!(is_email_shaped("jane.doe@example.org"));
        assert!(is_email_shaped("  jane.doe@example.org  "));
        assert!(!is_email_shaped("contact jane.doe@example.org today"));
        assert!(!is_email_shaped("not-an-email"));
        assert!(!is_email_shaped(""));
    }

    #[test]
    fn test_phone_with_dots_and_country_code() {
        assert_eq!(
            extract_phone("call +1 555.123.4567 today"),
            Some("+1 555.123.4567".to_string())
        );
    }

    #[test]
    fn test_name_is_first_plausible_line() {
        assert_eq!(
            extract_name(FIXTURE),
            Some(("Jane".to_string(), "Doe".to_string()))
        );
    }

    #[test]
    fn test_name_skips_contact_lines() {
        let text = "jane.doe@example.org\n(555) 123-4567\nJane Doe";
        assert_eq!(
            extract_name(text),
            Some(("Jane".to_string(), "Doe".to_string()))
        );
    }

    #[test]
    fn test_name_skips_header_looking_lines() {
        let text = "Professional Summary:\nJane Doe";
        assert_eq!(
            extract_name(text),
            Some(("Jane".to_string(), "Doe".to_string()))
        );
    }

    #[test]
    fn test_three_part_name_splits_first_and_rest() {
        assert_eq!(
            extract_name("Maria de Santos\n"),
            Some(("Maria".to_string(), "de Santos".to_string()))
        );
    }

    #[test]
    fn test_single_word_line_is_not_a_name() {
        assert_eq!(extract_name("Resume\n\n"), None);
    }

    #[test]
    fn test_no_contact_in_empty_text() {
        assert_eq!(extract_email(""), None);
        assert_eq!(extract_phone(""), None);
        assert_eq!(extract_name(""), None);
        assert_eq!(extract_location(""), None);
    }

    #[test]
    fn test_location_city_state() {
        assert_eq!(
            extract_location("Jane Doe\nSaint Paul, MN\n"),
            Some(("Saint Paul".to_string(), "MN".to_string()))
        );
    }

    #[test]
    fn test_location_with_zip() {
        assert_eq!(
            extract_location("Minneapolis, MN 55401"),
            Some(("Minneapolis".to_string(), "MN".to_string()))
        );
    }

    #[test]
    fn test_sentence_with_comma_is_not_location() {
        assert_eq!(extract_location("Managed intake, and more"), None);
    }
}
