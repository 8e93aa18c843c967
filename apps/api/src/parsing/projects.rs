use super::sections::{lines_of, split_sections, SectionKind};
use super::text::{clean_line, is_bullet};
use super::vocabulary::{find_terms, DATABASES, TECHNICAL_SKILLS, TOOLS};
use crate::models::resume::{ProjectEntry, StructuredResume};

const NAME_SEPARATORS: &[&str] = &[": ", " - ", " – ", " — ", " | "];

/// Entries from the projects section. A line after a blank line, or one written
/// as `Name: description`, opens a project; bullets and plain lines extend it.
pub fn detect_projects(text: &str) -> StructuredResume {
    let sections = split_sections(text);
    let mut projects: Vec<ProjectEntry> = Vec::new();
    let mut after_blank = true;

    for raw in lines_of(&sections, SectionKind::Projects) {
        let line = clean_line(raw);
        if line.is_empty() {
            after_blank = true;
            continue;
        }

        let split = split_name(line);
        let opens = projects.is_empty() || (!is_bullet(raw) && (after_blank || split.is_some()));
        after_blank = false;

        if opens {
            let (name, description) = split.unwrap_or((line, ""));
            projects.push(ProjectEntry {
                name: name.to_string(),
                description: description.to_string(),
                technologies: Vec::new(),
            });
        } else if let Some(current) = projects.last_mut() {
            if !current.description.is_empty() {
                current.description.push(' ');
            }
            current.description.push_str(line);
        }
    }

    for project in &mut projects {
        project.technologies = technologies(&format!("{} {}", project.name, project.description));
    }

    StructuredResume {
        projects,
        ..Default::default()
    }
}

fn split_name(line: &str) -> Option<(&str, &str)> {
    NAME_SEPARATORS
        .iter()
        .filter_map(|sep| line.find(sep).map(|i| (i, sep.len())))
        .min()
        .map(|(i, len)| (line[..i].trim(), line[i + len..].trim()))
        .filter(|(name, _)| !name.is_empty())
}

fn technologies(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut found: Vec<String> = Vec::new();
    for table in [TECHNICAL_SKILLS, TOOLS, DATABASES] {
        for term in find_terms(&lower, table) {
            if !found.iter().any(|t| t == term) {
                found.push(term.to_string());
            }
        }
    }
    found
}
