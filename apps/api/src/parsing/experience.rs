use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

use super::sections::{lines_or_fallback, split_sections, SectionKind};
use super::text::{clean_line, field_after_preposition, field_at, is_bullet, normalize_key};
use crate::models::resume::{ExperienceEntry, StructuredResume};

lazy_static! {
    static ref JOB_TITLE: Regex = Regex::new(
        r"(?i)\b(?:engineer|developer|programmer|manager|analyst|designer|consultant|director|intern|architect|administrator|scientist|specialist|coordinator|officer|technician|lead|head of|founder|co-founder|vp)\b"
    )
    .unwrap();

    static ref COMPANY: Regex = Regex::new(
        r"\b[A-Z][\w&.\-]*(?:\s+[A-Z&][\w&.\-]*)*,?\s+(?:Inc|Corp|Corporation|LLC|Ltd|Limited|Company|Co|GmbH|PLC)\b\.?"
    )
    .unwrap();

    static ref YEARS_PHRASE: Regex =
        Regex::new(r"(?i)\b\d+\+?\s*(?:years?|yrs?)(?:\s*(?:and\s*)?\d+\s*months?)?").unwrap();

    static ref DATE_RANGE: Regex = Regex::new(
        r"(?i)\b(?:(?:jan|feb|mar|apr|may|jun|jul|aug|sep|sept|oct|nov|dec)[a-z]*\.?\s+|\d{1,2}/)?(?:19|20)\d{2}\s*(?:-|–|—|to)\s*(?:present|current|now|today|(?:(?:jan|feb|mar|apr|may|jun|jul|aug|sep|sept|oct|nov|dec)[a-z]*\.?\s+|\d{1,2}/)?(?:19|20)\d{2})"
    )
    .unwrap();
}

/// Sections never scanned for work history when no experience header exists.
const NON_EXPERIENCE: &[SectionKind] = &[
    SectionKind::Summary,
    SectionKind::Education,
    SectionKind::Skills,
    SectionKind::Languages,
    SectionKind::Certifications,
    SectionKind::Projects,
];

/// Header lines longer than this are prose, not a role line.
const MAX_ROLE_LINE: usize = 120;

/// Job-title and company-suffix lines open an entry; bullets and other lines
/// that follow are its description.
pub fn detect_experience(text: &str) -> StructuredResume {
    let sections = split_sections(text);
    let lines = lines_or_fallback(&sections, SectionKind::Experience, NON_EXPERIENCE);

    let mut entries: Vec<ExperienceEntry> = Vec::new();
    let mut description: Vec<String> = Vec::new();

    for raw in lines {
        let line = clean_line(raw);
        if line.is_empty() {
            continue;
        }

        let title = (!is_bullet(raw) && line.len() <= MAX_ROLE_LINE)
            .then(|| JOB_TITLE.find(line))
            .flatten()
            .map(|m| field_at(line, m.start()).to_string());
        let company = (!is_bullet(raw) && line.len() <= MAX_ROLE_LINE)
            .then(|| find_company(line, title.as_deref()))
            .flatten();

        if title.is_none() && company.is_none() {
            match entries.last_mut() {
                Some(current) if current.duration.is_empty() && description.is_empty() => {
                    match find_duration(line) {
                        Some(duration) => current.duration = duration,
                        None => description.push(line.to_string()),
                    }
                }
                Some(_) => description.push(line.to_string()),
                None => {}
            }
            continue;
        }

        // "Senior Engineer" followed by "Acme Inc | 2019 - 2021" is one role.
        if let Some(current) = entries.last_mut() {
            let completes_previous = description.is_empty()
                && ((current.company.is_empty() && title.is_none())
                    || (current.title.is_empty() && company.is_none()));
            if completes_previous {
                if let Some(company) = company {
                    current.company = company;
                }
                if let Some(title) = title {
                    current.title = title;
                }
                if current.duration.is_empty() {
                    current.duration = find_duration(line).unwrap_or_default();
                }
                continue;
            }
            current.description = description.join("\n");
            description.clear();
        }

        entries.push(ExperienceEntry {
            title: title.unwrap_or_default(),
            company: company.unwrap_or_default(),
            duration: find_duration(line).unwrap_or_default(),
            description: String::new(),
        });
    }

    if let Some(current) = entries.last_mut() {
        current.description = description.join("\n");
    }

    StructuredResume {
        experience: dedup(entries),
        ..Default::default()
    }
}

fn find_company(line: &str, title: Option<&str>) -> Option<String> {
    if let Some(m) = COMPANY.find(line) {
        return Some(m.as_str().trim().to_string());
    }
    // "Engineer at Acme" names the employer without a legal suffix.
    if title.is_none() {
        return None;
    }
    field_after_preposition(line)
        .filter(|field| !JOB_TITLE.is_match(field) && find_duration(field).is_none())
        .map(str::to_string)
}

/// Date range and/or an explicit "N years" phrase, whichever the line carries.
fn find_duration(line: &str) -> Option<String> {
    let range = DATE_RANGE.find(line).map(|m| m.as_str().trim());
    let years = YEARS_PHRASE.find(line).map(|m| m.as_str().trim());
    match (range, years) {
        (Some(range), Some(years)) => Some(format!("{range} ({years})")),
        (Some(range), None) => Some(range.to_string()),
        (None, Some(years)) => Some(years.to_string()),
        (None, None) => None,
    }
}

fn dedup(entries: Vec<ExperienceEntry>) -> Vec<ExperienceEntry> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|e| {
            seen.insert(format!(
                "{}|{}|{}",
                normalize_key(&e.title),
                normalize_key(&e.company),
                normalize_key(&e.duration)
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HISTORY: &str = "EXPERIENCE\n\
        Senior Software Engineer at Acme Inc\n\
        Jan 2019 - Present (4 years)\n\
        - Led migration to Kubernetes\n\
        - Mentored 5 engineers\n\
        \n\
        Software Developer, Globex LLC, 2 years\n\
        - Built REST APIs\n\
        \n\
        EDUCATION\n\
        BSc Computer Science\n";

    #[test]
    fn test_entries_with_title_company_duration_description() {
        let experience = detect_experience(HISTORY).experience;
        assert_eq!(experience.len(), 2);

        assert_eq!(experience[0].title, "Senior Software Engineer");
        assert_eq!(experience[0].company, "Acme Inc");
        assert_eq!(experience[0].duration, "Jan 2019 - Present (4 years)");
        assert_eq!(
            experience[0].description,
            "Led migration to Kubernetes\nMentored 5 engineers"
        );

        assert_eq!(experience[1].title, "Software Developer");
        assert_eq!(experience[1].company, "Globex LLC");
        assert_eq!(experience[1].duration, "2 years");
        assert_eq!(experience[1].description, "Built REST APIs");
    }

    #[test]
    fn test_title_and_company_on_separate_lines_merge() {
        let text = "Work Experience\nData Analyst\nInitech Ltd | 2016 - 2018\n• Built dashboards";
        let experience = detect_experience(text).experience;
        assert_eq!(experience.len(), 1);
        assert_eq!(experience[0].title, "Data Analyst");
        assert_eq!(experience[0].company, "Initech Ltd");
        assert_eq!(experience[0].duration, "2016 - 2018");
        assert_eq!(experience[0].description, "Built dashboards");
    }

    #[test]
    fn test_company_without_suffix_after_at() {
        let text = "Experience\nProduct Manager at Hooli, 2020 - 2022";
        let experience = detect_experience(text).experience;
        assert_eq!(experience[0].company, "Hooli");
        assert_eq!(experience[0].duration, "2020 - 2022");
    }

    #[test]
    fn test_unresolved_fields_are_empty_strings() {
        let experience = detect_experience("Experience\nFreelance Consultant").experience;
        assert_eq!(experience.len(), 1);
        assert_eq!(experience[0].company, "");
        assert_eq!(experience[0].duration, "");
    }

    #[test]
    fn test_duplicate_role_lines_collapse() {
        let text = "Experience\nQA Engineer, Vandelay Corp\nQA Engineer, Vandelay Corp";
        assert_eq!(detect_experience(text).experience.len(), 1);
    }

    #[test]
    fn test_education_section_is_not_experience() {
        let text = "Education\nResearch Assistant, Institute of Physics";
        assert!(detect_experience(text).experience.is_empty());
    }

    #[test]
    fn test_years_phrase_alone() {
        assert_eq!(find_duration("3+ years").as_deref(), Some("3+ years"));
        assert_eq!(find_duration("nothing"), None);
    }
}
