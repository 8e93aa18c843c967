use std::collections::BTreeSet;

use super::vocabulary::{
    find_terms, DATABASES, FRAMEWORKS, PROGRAMMING_LANGUAGES, SOFT_SKILLS, TECHNICAL_SKILLS, TOOLS,
};
use crate::models::resume::{SkillSet, StructuredResume};

/// Vocabulary lookup over the whole text; one bucket per table.
pub fn detect_skills(text: &str) -> StructuredResume {
    let lower = text.to_lowercase();
    let bucket = |table: &[&str]| -> BTreeSet<String> {
        find_terms(&lower, table).into_iter().map(str::to_string).collect()
    };

    StructuredResume {
        skills: SkillSet {
            technical: bucket(TECHNICAL_SKILLS),
            soft: bucket(SOFT_SKILLS),
            tools: bucket(TOOLS),
            frameworks: bucket(FRAMEWORKS),
            databases: bucket(DATABASES),
            languages: bucket(PROGRAMMING_LANGUAGES),
        },
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_category_assignment_is_pinned() {
        let skills = detect_skills("JavaScript, React, Node.js, PostgreSQL").skills;
        assert_eq!(skills.technical, set(&["JavaScript", "React", "Node.js"]));
        assert_eq!(skills.frameworks, set(&["React", "Node.js"]));
        assert_eq!(skills.databases, set(&["PostgreSQL"]));
        assert_eq!(skills.languages, set(&["JavaScript"]));
        assert!(skills.tools.is_empty());
        assert!(skills.soft.is_empty());
    }

    #[test]
    fn test_duplicates_and_case_collapse() {
        let skills = detect_skills("python PYTHON Python; docker, Docker").skills;
        assert_eq!(skills.technical, set(&["Python"]));
        assert_eq!(skills.tools, set(&["Docker"]));
    }

    #[test]
    fn test_soft_skills() {
        let skills = detect_skills("Strong leadership and communication; problem solving").skills;
        assert_eq!(
            skills.soft,
            set(&["Communication", "Leadership", "Problem Solving"])
        );
    }

    #[test]
    fn test_no_terms_gives_empty_buckets() {
        assert_eq!(detect_skills("I like long walks").skills, SkillSet::default());
    }
}
