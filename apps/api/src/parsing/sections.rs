use super::vocabulary::SUMMARY_HEADERS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    /// Lines before the first recognised header (name, contact block).
    Preamble,
    Summary,
    Experience,
    Education,
    Skills,
    Languages,
    Certifications,
    Projects,
    Contact,
    /// Recognised header with no detector of its own (interests, references...).
    Other,
}

const HEADERS: &[(SectionKind, &[&str])] = &[
    (SectionKind::Summary, SUMMARY_HEADERS),
    (
        SectionKind::Experience,
        &[
            "experience",
            "work experience",
            "professional experience",
            "relevant experience",
            "employment",
            "employment history",
            "work history",
            "career history",
        ],
    ),
    (
        SectionKind::Education,
        &[
            "education",
            "academic background",
            "academic history",
            "education and training",
            "qualifications",
            "academic qualifications",
        ],
    ),
    (
        SectionKind::Skills,
        &[
            "skills",
            "technical skills",
            "key skills",
            "core competencies",
            "competencies",
            "technologies",
            "tech stack",
            "expertise",
            "skills and expertise",
        ],
    ),
    (
        SectionKind::Languages,
        &["languages", "language skills", "spoken languages"],
    ),
    (
        SectionKind::Certifications,
        &[
            "certifications",
            "certificates",
            "licenses",
            "licenses and certifications",
            "certifications and licenses",
            "courses and certifications",
        ],
    ),
    (
        SectionKind::Projects,
        &["projects", "personal projects", "key projects", "selected projects", "side projects"],
    ),
    (
        SectionKind::Contact,
        &[
            "contact",
            "contact information",
            "contact details",
            "personal details",
            "personal information",
        ],
    ),
    (
        SectionKind::Other,
        &[
            "interests",
            "hobbies",
            "references",
            "awards",
            "achievements",
            "publications",
            "volunteer",
            "volunteering",
        ],
    ),
];

#[derive(Debug, Clone)]
pub struct Section {
    pub kind: SectionKind,
    pub lines: Vec<String>,
}

/// Partitions text into header-delimited sections. Blank lines are kept so
/// detectors can use them as paragraph breaks.
pub fn split_sections(text: &str) -> Vec<Section> {
    let mut sections = vec![Section {
        kind: SectionKind::Preamble,
        lines: Vec::new(),
    }];

    for raw in text.lines() {
        let line = raw.trim();
        match classify_header(line) {
            Some((kind, inline)) => {
                let mut lines = Vec::new();
                if let Some(rest) = inline {
                    lines.push(rest);
                }
                sections.push(Section { kind, lines });
            }
            None => {
                if let Some(current) = sections.last_mut() {
                    current.lines.push(line.to_string());
                }
            }
        }
    }

    sections
}

/// Lines of every section of `kind`, in document order.
pub fn lines_of(sections: &[Section], kind: SectionKind) -> Vec<&str> {
    sections
        .iter()
        .filter(|s| s.kind == kind)
        .flat_map(|s| s.lines.iter().map(String::as_str))
        .collect()
}

/// Lines of `kind` when such a section exists, otherwise every line outside the
/// `excluded` sections.
pub fn lines_or_fallback<'a>(
    sections: &'a [Section],
    kind: SectionKind,
    excluded: &[SectionKind],
) -> Vec<&'a str> {
    if sections.iter().any(|s| s.kind == kind) {
        return lines_of(sections, kind);
    }
    sections
        .iter()
        .filter(|s| !excluded.contains(&s.kind))
        .flat_map(|s| s.lines.iter().map(String::as_str))
        .collect()
}

/// Recognises `EDUCATION`, `## Skills`, `Work Experience:` and
/// `Summary: inline text` as headers.
pub fn classify_header(line: &str) -> Option<(SectionKind, Option<String>)> {
    if line.is_empty() {
        return None;
    }

    let (head, inline) = match line.split_once(':') {
        Some((head, rest)) => {
            let rest = rest.trim();
            (head, (!rest.is_empty()).then(|| rest.to_string()))
        }
        None => (line, None),
    };

    if head.len() > 48 {
        return None;
    }
    let normalized = normalize_header(head);
    if normalized.is_empty() || normalized.split_whitespace().count() > 5 {
        return None;
    }

    HEADERS
        .iter()
        .find(|(_, synonyms)| synonyms.contains(&normalized.as_str()))
        .map(|(kind, _)| (*kind, inline))
}

fn normalize_header(head: &str) -> String {
    head.trim_matches(|c: char| !c.is_alphanumeric())
        .replace('&', "and")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
