use std::collections::HashSet;

use super::sections::{lines_of, split_sections, SectionKind};
use super::vocabulary::{contains_term, find_terms, PROFICIENCY_LEVELS, SPOKEN_LANGUAGES};
use crate::models::resume::{SpokenLanguage, StructuredResume};

/// Spoken languages with the proficiency written next to them. Outside a
/// languages section a line only counts when it also states a proficiency.
pub fn detect_languages(text: &str) -> StructuredResume {
    let sections = split_sections(text);
    let in_section = sections.iter().any(|s| s.kind == SectionKind::Languages);
    let lines: Vec<&str> = if in_section {
        lines_of(&sections, SectionKind::Languages)
    } else {
        text.lines().collect()
    };

    let mut seen = HashSet::new();
    let mut languages = Vec::new();

    for line in lines {
        for chunk in line.split([',', ';', '|', '•', '/']) {
            let lower = chunk.to_lowercase();
            let proficiency = find_terms(&lower, PROFICIENCY_LEVELS)
                .first()
                .map(|p| p.to_string())
                .unwrap_or_default();

            if !in_section && proficiency.is_empty() && !contains_term(&lower, "language") {
                continue;
            }

            for language in find_terms(&lower, SPOKEN_LANGUAGES) {
                if seen.insert(language) {
                    languages.push(SpokenLanguage {
                        language: language.to_string(),
                        proficiency: proficiency.clone(),
                    });
                }
            }
        }
    }

    StructuredResume {
        languages_spoken: languages,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_languages_section_with_proficiency() {
        let text = "Languages\nEnglish (Native), Spanish - Fluent\nGerman";
        let langs = detect_languages(text).languages_spoken;
        assert_eq!(langs.len(), 3);
        assert_eq!(langs[0].language, "English");
        assert_eq!(langs[0].proficiency, "Native");
        assert_eq!(langs[1].language, "Spanish");
        assert_eq!(langs[1].proficiency, "Fluent");
        assert_eq!(langs[2].language, "German");
        assert_eq!(langs[2].proficiency, "");
    }

    #[test]
    fn test_outside_section_requires_proficiency_or_language_word() {
        let text = "BA in English Literature\nFluent in French";
        let langs = detect_languages(text).languages_spoken;
        assert_eq!(langs.len(), 1);
        assert_eq!(langs[0].language, "French");
    }

    #[test]
    fn test_repeated_language_kept_once() {
        let text = "Languages: English C2; english (fluent)";
        let langs = detect_languages(text).languages_spoken;
        assert_eq!(langs.len(), 1);
        assert_eq!(langs[0].proficiency, "C2");
    }
}
