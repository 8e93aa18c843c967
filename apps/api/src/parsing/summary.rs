use super::sections::{split_sections, SectionKind};
use crate::models::resume::StructuredResume;

/// Text under the first summary-like header, up to the first blank line.
pub fn detect_summary(text: &str) -> StructuredResume {
    let summary = split_sections(text)
        .into_iter()
        .find(|s| s.kind == SectionKind::Summary)
        .map(|section| {
            section
                .lines
                .iter()
                .map(|l| l.trim())
                .skip_while(|l| l.is_empty())
                .take_while(|l| !l.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default();

    StructuredResume {
        summary,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_lines_joined() {
        let text = "Jane Doe\n\nPROFESSIONAL SUMMARY\nBackend engineer with 8 years\nof distributed systems work.\n\nExperience\n...";
        assert_eq!(
            detect_summary(text).summary,
            "Backend engineer with 8 years of distributed systems work."
        );
    }

    #[test]
    fn test_inline_summary_and_first_header_wins() {
        let text = "Objective: Seeking a data role\n\nProfile\nSomething else";
        assert_eq!(detect_summary(text).summary, "Seeking a data role");
    }

    #[test]
    fn test_missing_summary_is_empty() {
        assert_eq!(detect_summary("Skills\nRust").summary, "");
    }
}
