use std::collections::HashSet;

use super::sections::{lines_or_fallback, split_sections, SectionKind};
use super::text::{clean_line, last_year, normalize_key};
use super::vocabulary::{contains_term, CERTIFICATION_KEYWORDS};
use crate::models::resume::{Certification, StructuredResume};

/// Outside a certifications section, these never hold certification lines.
const NON_CERTIFICATION: &[SectionKind] = &[
    SectionKind::Summary,
    SectionKind::Experience,
    SectionKind::Education,
    SectionKind::Skills,
    SectionKind::Projects,
];

/// Every line of a certifications section is a certification. Elsewhere a line
/// must carry a certification or vendor keyword.
pub fn detect_certifications(text: &str) -> StructuredResume {
    let sections = split_sections(text);
    let in_section = sections.iter().any(|s| s.kind == SectionKind::Certifications);

    let mut seen = HashSet::new();
    let mut certifications = Vec::new();

    for raw in lines_or_fallback(&sections, SectionKind::Certifications, NON_CERTIFICATION) {
        let line = clean_line(raw);
        if line.is_empty() {
            continue;
        }
        let lower = line.to_lowercase();
        let keyword = CERTIFICATION_KEYWORDS
            .iter()
            .find(|(keyword, _)| contains_term(&lower, keyword));
        if keyword.is_none() && !in_section {
            continue;
        }

        let name = certification_name(line);
        if name.is_empty() || !seen.insert(normalize_key(name)) {
            continue;
        }

        certifications.push(Certification {
            name: name.to_string(),
            issuer: keyword
                .map(|(_, issuer)| *issuer)
                .filter(|issuer| !issuer.is_empty())
                .map(str::to_string),
            date: last_year(line),
        });
    }

    StructuredResume {
        certifications,
        ..Default::default()
    }
}

/// The line up to the first field separator: `AWS Certified Developer (2021)`.
fn certification_name(line: &str) -> &str {
    [" | ", ", ", " (", " – ", " — "]
        .iter()
        .filter_map(|sep| line.find(sep))
        .min()
        .map_or(line, |end| &line[..end])
        .trim()
}
