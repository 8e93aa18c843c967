use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

use super::sections::{lines_or_fallback, split_sections, SectionKind};
use super::text::{clean_line, field_after_preposition, field_at, last_year, normalize_key};
use crate::models::resume::{EducationEntry, StructuredResume};

lazy_static! {
    /// Doctoral, master, bachelor, associate and secondary indicators.
    static ref DEGREE_PATTERNS: Vec<Regex> = [
        r"(?i)\b(?:ph\.?\s?d\b\.?|doctorate\b|doctor of\b|d\.?phil\b)",
        r"(?i)\b(?:master'?s?\b|m\.?sc\b|mba\b|m\.?eng\b)",
        r"(?i)\b(?:bachelor'?s?\b|b\.?sc\b|b\.?eng\b|b\.?tech\b)",
        r"(?i)\bassociate(?:'s)?\s+(?:degree|of)\b",
        r"(?i)\b(?:high school|secondary school|ged)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect();

    static ref INSTITUTION: Regex = Regex::new(
        r"\b(?:[A-Z][\w&'.\-]*\s+)*(?:University|College|Institute|School|Academy|Polytechnic)(?:\s+of(?:\s+[A-Z][\w&'.\-]*)+)?"
    )
    .unwrap();

    static ref GPA: Regex =
        Regex::new(r"(?i)\b(?:gpa|cgpa|grade point average)\s*[:\-]?\s*(\d(?:\.\d{1,2})?(?:\s*/\s*\d(?:\.\d{1,2})?)?)")
            .unwrap();

    /// Job and certification titles that contain "master" without naming a degree.
    static ref NON_DEGREE_MASTER: Regex =
        Regex::new(r"(?i)\b(?:scrum|quarter|post|grand|toast|web|ring|band|head)\s+master\b").unwrap();
}

/// Sections whose lines never describe education when no education header exists.
const NON_EDUCATION: &[SectionKind] = &[
    SectionKind::Experience,
    SectionKind::Certifications,
    SectionKind::Skills,
    SectionKind::Projects,
];

/// Degree-keyword and institution-keyword lines become education entries.
/// Entries describing the same degree at the same institution are emitted once.
pub fn detect_education(text: &str) -> StructuredResume {
    let sections = split_sections(text);
    let in_section = sections.iter().any(|s| s.kind == SectionKind::Education);
    let lines: Vec<&str> = lines_or_fallback(&sections, SectionKind::Education, NON_EDUCATION)
        .into_iter()
        .map(clean_line)
        .filter(|l| !l.is_empty())
        .collect();

    let mut entries: Vec<EducationEntry> = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];

        if let Some(start) = earliest_degree_match(line) {
            let mut entry = EducationEntry {
                degree: field_at(line, start).to_string(),
                institution: find_institution(line),
                year: last_year(line),
                gpa: find_gpa(line),
            };

            // Institution on the following line ("BSc Physics" / "University of Leeds, 2012").
            if let Some(next) = lines.get(i + 1) {
                if earliest_degree_match(next).is_none() && INSTITUTION.is_match(next) {
                    if entry.institution.is_none() {
                        entry.institution = find_institution(next);
                    }
                    if entry.year.is_none() {
                        entry.year = last_year(next);
                    }
                    if entry.gpa.is_none() {
                        entry.gpa = find_gpa(next);
                    }
                    i += 1;
                }
            }
            entries.push(entry);
        } else if let Some(gpa) = find_gpa(line) {
            if let Some(last) = entries.last_mut().filter(|e| e.gpa.is_none()) {
                last.gpa = Some(gpa);
            }
        } else if in_section {
            if let Some(institution) = INSTITUTION.find(line) {
                entries.push(EducationEntry {
                    degree: String::new(),
                    institution: Some(institution.as_str().trim().to_string()),
                    year: last_year(line),
                    gpa: None,
                });
            }
        }
        i += 1;
    }

    StructuredResume {
        education: dedup(entries),
        ..Default::default()
    }
}

/// Byte offset of the leftmost degree indicator on the line. Several patterns may
/// hit the same span ("Master of Business Administration (MBA)"); the line still
/// yields a single entry. "Scrum Master" and similar titles are not degrees.
fn earliest_degree_match(line: &str) -> Option<usize> {
    let titles: Vec<_> = NON_DEGREE_MASTER.find_iter(line).map(|m| m.range()).collect();
    DEGREE_PATTERNS
        .iter()
        .flat_map(|re| re.find_iter(line))
        .map(|m| m.start())
        .filter(|start| !titles.iter().any(|title| title.contains(start)))
        .min()
}

fn find_institution(line: &str) -> Option<String> {
    INSTITUTION
        .find(line)
        .map(|m| m.as_str().trim().to_string())
        .or_else(|| field_after_preposition(line).map(str::to_string))
}

fn find_gpa(line: &str) -> Option<String> {
    GPA.captures(line).map(|caps| caps[1].replace(' ', ""))
}

fn dedup(entries: Vec<EducationEntry>) -> Vec<EducationEntry> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|e| {
            let key = format!(
                "{}|{}",
                normalize_key(&e.degree),
                normalize_key(e.institution.as_deref().unwrap_or_default())
            );
            seen.insert(key)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degrees_institutions_years_and_gpa() {
        let text = "EDUCATION\n\
            PhD in Computer Science from MIT, 2015\n\
            Bachelor of Arts, Stanford University, 2009\n\
            GPA: 3.8 / 4.0\n";
        let education = detect_education(text).education;
        assert_eq!(education.len(), 2);

        assert_eq!(education[0].degree, "PhD in Computer Science");
        assert_eq!(education[0].institution.as_deref(), Some("MIT"));
        assert_eq!(education[0].year.as_deref(), Some("2015"));

        assert_eq!(education[1].degree, "Bachelor of Arts");
        assert_eq!(education[1].institution.as_deref(), Some("Stanford University"));
        assert_eq!(education[1].gpa.as_deref(), Some("3.8/4.0"));
    }

    #[test]
    fn test_overlapping_patterns_yield_one_entry() {
        let text = "Education\nMaster of Business Administration (MBA), Harvard Business School";
        let education = detect_education(text).education;
        assert_eq!(education.len(), 1);
        assert_eq!(education[0].degree, "Master of Business Administration");
        assert_eq!(education[0].institution.as_deref(), Some("Harvard Business School"));
    }

    #[test]
    fn test_repeated_mentions_are_deduplicated() {
        let text = "MSc Physics, University of Leeds\nEducation\nMSc Physics, University of Leeds";
        // With an education section only its lines are scanned.
        assert_eq!(detect_education(text).education.len(), 1);

        let no_header = "MSc Physics, University of Leeds\n\nMSc  physics, University of Leeds";
        assert_eq!(detect_education(no_header).education.len(), 1);
    }

    #[test]
    fn test_institution_on_following_line() {
        let text = "Education\nBSc Mathematics\nUniversity of Toronto, 2012";
        let education = detect_education(text).education;
        assert_eq!(education.len(), 1);
        assert_eq!(education[0].institution.as_deref(), Some("University of Toronto"));
        assert_eq!(education[0].year.as_deref(), Some("2012"));
    }

    #[test]
    fn test_associate_job_title_is_not_a_degree() {
        let text = "Associate Software Engineer at Initech LLC";
        assert!(detect_education(text).education.is_empty());
    }

    #[test]
    fn test_scrum_master_certification_is_not_a_degree() {
        assert!(detect_education("Jane Doe\nCertified Scrum Master, 2020")
            .education
            .is_empty());

        let text = "Scrum Master at Initech LLC\nMaster of Science, University of Leeds";
        let education = detect_education(text).education;
        assert_eq!(education.len(), 1);
        assert_eq!(education[0].degree, "Master of Science");
    }

    #[test]
    fn test_no_education_is_empty() {
        assert!(detect_education("Skills: Rust").education.is_empty());
    }
}
