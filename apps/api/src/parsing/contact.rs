use lazy_static::lazy_static;
use regex::Regex;

use super::sections::{classify_header, lines_of, split_sections, SectionKind};
use crate::models::resume::{ContactInfo, PersonalInfo, StructuredResume};

lazy_static! {
    static ref EMAIL: Regex =
        Regex::new(r"(?i)\b[a-z0-9._%+\-]+@[a-z0-9.\-]+\.[a-z]{2,}\b").unwrap();
    static ref PHONE: Regex =
        Regex::new(r"(?:\+\d{1,3}[\s.\-]?)?(?:\(\d{2,4}\)[\s.\-]?)?\d{2,4}(?:[\s.\-]\d{2,4}){1,4}")
            .unwrap();
    static ref LINKEDIN: Regex =
        Regex::new(r"(?i)(?:https?://)?(?:[a-z]{2,3}\.)?linkedin\.com/(?:in|pub)/[a-z0-9_\-%]+/?")
            .unwrap();
    static ref WEBSITE: Regex =
        Regex::new(r"(?i)\b(?:https?://|www\.)[a-z0-9.\-]+\.[a-z]{2,}(?:/[^\s,;]*)?").unwrap();
    static ref ADDRESS: Regex = Regex::new(r"(?i)^\s*address\s*[:\-]\s*(.+)$").unwrap();
    static ref DATE_OF_BIRTH: Regex =
        Regex::new(r"(?i)\b(?:date of birth|d\.?o\.?b\.?|born(?: on)?)\s*[:\-]?\s*([0-9A-Za-z ,./\-]{6,30})")
            .unwrap();
    static ref NATIONALITY: Regex =
        Regex::new(r"(?i)\b(?:nationality|citizenship)\s*[:\-]\s*([A-Za-z ]{3,30})").unwrap();
    static ref LOCATION: Regex =
        Regex::new(r"(?i)\b(?:location|based in|residence)\s*[:\-]?\s*([A-Za-z ,.\-]{2,60})").unwrap();
}

/// Email, phone, LinkedIn, website and address lines.
pub fn detect_contact(text: &str) -> StructuredResume {
    let linkedin = LINKEDIN.find(text).map(|m| m.as_str().trim_end_matches('/').to_string());

    let website = WEBSITE
        .find_iter(text)
        .map(|m| m.as_str().trim_end_matches(|c| c == '.' || c == '/').to_string())
        .find(|url| !url.to_lowercase().contains("linkedin.com"));

    let address = text
        .lines()
        .find_map(|line| ADDRESS.captures(line))
        .map(|caps| caps[1].trim().to_string());

    StructuredResume {
        contact_info: ContactInfo {
            email: EMAIL.find(text).map(|m| m.as_str().to_string()),
            phone: find_phone(text),
            address,
            linkedin,
            website,
        },
        ..Default::default()
    }
}

/// Phone numbers need at least seven digits; date ranges such as `2018 - 2021`
/// and four-digit years are not phones.
fn find_phone(text: &str) -> Option<String> {
    PHONE
        .find_iter(text)
        .map(|m| m.as_str().trim().to_string())
        .find(|candidate| {
            let digits = candidate.chars().filter(char::is_ascii_digit).count();
            let looks_like_years = candidate
                .split(|c: char| !c.is_ascii_digit())
                .filter(|part| !part.is_empty())
                .all(|part| part.len() == 4 && (part.starts_with("19") || part.starts_with("20")));
            (7..=15).contains(&digits) && !looks_like_years
        })
}

/// Name, date of birth, nationality and location.
pub fn detect_personal(text: &str) -> StructuredResume {
    let sections = split_sections(text);
    let mut candidates = lines_of(&sections, SectionKind::Preamble);
    candidates.extend(lines_of(&sections, SectionKind::Contact));

    let full_name = candidates
        .iter()
        .map(|l| l.trim())
        .find(|line| looks_like_name(line))
        .map(str::to_string);

    let capture = |re: &Regex| {
        re.captures(text)
            .map(|caps| caps[1].trim().trim_end_matches(|c| c == ',' || c == '.').to_string())
            .filter(|v| !v.is_empty())
    };

    StructuredResume {
        personal_info: PersonalInfo {
            full_name,
            date_of_birth: capture(&*DATE_OF_BIRTH),
            nationality: capture(&*NATIONALITY),
            location: text
                .lines()
                .find_map(|line| LOCATION.captures(line))
                .map(|caps| caps[1].trim().to_string()),
        },
        ..Default::default()
    }
}

fn looks_like_name(line: &str) -> bool {
    let words: Vec<&str> = line.split_whitespace().collect();
    (2..=4).contains(&words.len())
        && classify_header(line).is_none()
        && words.iter().all(|w| {
            w.chars().next().is_some_and(char::is_uppercase)
                && w.chars().all(|c| c.is_alphabetic() || c == '-' || c == '\'' || c == '.')
        })
}
