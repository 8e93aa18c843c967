//! Line-level helpers shared by the detectors.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Field separators inside a single résumé line.
    static ref SEPARATOR: Regex =
        Regex::new(r"\s+(?:from|at|@)\s+|\s*[,|;–—•]\s*|\s+-\s+|\s*\(|\)").unwrap();
    pub static ref YEAR: Regex = Regex::new(r"\b(?:19|20)\d{2}\b").unwrap();
}

const BULLETS: &[char] = &['•', '-', '*', '·', '▪', '◦', '‣', '○', '►', '–'];

pub fn is_bullet(line: &str) -> bool {
    line.trim_start().starts_with(BULLETS)
}

/// Drops leading bullet glyphs and surrounding whitespace.
pub fn clean_line(line: &str) -> &str {
    line.trim().trim_start_matches(BULLETS).trim()
}

/// Dedup key: lowercase alphanumerics, single-spaced.
pub fn normalize_key(value: &str) -> String {
    value
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// The separator-delimited field of `line` that contains byte offset `at`.
pub fn field_at(line: &str, at: usize) -> &str {
    let mut start = 0;
    let mut end = line.len();
    for sep in SEPARATOR.find_iter(line) {
        if sep.end() <= at {
            start = sep.end();
        } else if sep.start() > at {
            end = sep.start();
            break;
        }
    }
    line[start..end].trim()
}

/// The field following ` at ` / ` from ` / `@`, if any.
pub fn field_after_preposition(line: &str) -> Option<&str> {
    let lower = line.to_ascii_lowercase();
    [" at ", " from ", " @ "]
        .iter()
        .filter_map(|p| lower.find(p).map(|i| i + p.len()))
        .min()
        .map(|at| field_at(line, at))
        .filter(|field| !field.is_empty())
}

pub fn last_year(line: &str) -> Option<String> {
    YEAR.find_iter(line).last().map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_line_strips_bullets() {
        assert_eq!(clean_line("  • Built APIs "), "Built APIs");
        assert_eq!(clean_line("- Led team"), "Led team");
        assert!(is_bullet("* item"));
        assert!(!is_bullet("Senior Engineer"));
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("  PhD, Computer-Science "), "phd computer science");
    }

    #[test]
    fn test_field_at_splits_on_separators() {
        let line = "PhD in Computer Science from MIT, 2015";
        assert_eq!(field_at(line, 0), "PhD in Computer Science");
        assert_eq!(field_after_preposition(line), Some("MIT"));
    }

    #[test]
    fn test_field_after_preposition_absent() {
        assert_eq!(field_after_preposition("Software Developer, Globex LLC"), None);
    }

    #[test]
    fn test_last_year() {
        assert_eq!(last_year("2015 - 2019").as_deref(), Some("2019"));
        assert_eq!(last_year("no year"), None);
    }
}
