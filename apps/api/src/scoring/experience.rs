use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;

use super::recommendations::{self, EXPERIENCE, NO_EXPERIENCE};
use super::{AnalysisParameters, AnalysisType, DimensionScore, DimensionScorer};
use crate::models::resume::StructuredResume;

lazy_static! {
    static ref YEARS: Regex = Regex::new(r"(?i)(\d+)\+?\s*(?:years?|yrs?)\b").unwrap();
}

const YEARS_CAP: f64 = 50.0;
const SENIORITY_CAP: f64 = 30.0;
const VARIETY_CAP: f64 = 20.0;

pub struct ExperienceScorer;

impl DimensionScorer for ExperienceScorer {
    fn analysis_type(&self) -> AnalysisType {
        AnalysisType::Experience
    }

    fn score(&self, resume: &StructuredResume, parameters: &AnalysisParameters) -> DimensionScore {
        let entries = &resume.experience;
        if entries.is_empty() {
            return DimensionScore::nothing_found(
                self.analysis_type(),
                parameters,
                "No experience found",
                NO_EXPERIENCE,
            );
        }

        let total_years = entries
            .iter()
            .map(|e| years_in(&e.duration))
            .fold(0u32, u32::saturating_add);
        let senior_titles = entries
            .iter()
            .filter(|e| e.title.to_lowercase().contains("senior"))
            .count();

        let years = (f64::from(total_years) * 5.0).min(YEARS_CAP);
        let seniority = (senior_titles as f64 * 15.0).min(SENIORITY_CAP);
        let variety = (entries.len() as f64 * 4.0).min(VARIETY_CAP);

        let breakdown = BTreeMap::from([
            ("years".to_string(), years),
            ("seniority".to_string(), seniority),
            ("variety".to_string(), variety),
        ]);

        DimensionScore::from_breakdown(
            self.analysis_type(),
            parameters,
            breakdown,
            recommendations::for_score(&EXPERIENCE, years + seniority + variety),
        )
    }
}

/// First integer followed by "year"/"yr" in a free-text duration; 0 when absent.
/// Not calendar arithmetic: "2015 - 2020" contributes nothing.
fn years_in(duration: &str) -> u32 {
    YEARS
        .captures(duration)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::ExperienceEntry;

    fn entry(title: &str, duration: &str) -> ExperienceEntry {
        ExperienceEntry {
            title: title.to_string(),
            company: String::new(),
            duration: duration.to_string(),
            description: String::new(),
        }
    }

    fn resume(entries: Vec<ExperienceEntry>) -> StructuredResume {
        StructuredResume {
            experience: entries,
            ..Default::default()
        }
    }

    #[test]
    fn test_years_parsing() {
        assert_eq!(years_in("Jan 2019 - Present (4 years)"), 4);
        assert_eq!(years_in("5+ yrs"), 5);
        assert_eq!(years_in("2 years 6 months"), 2);
        assert_eq!(years_in("2015 - 2020"), 0);
        assert_eq!(years_in(""), 0);
    }

    #[test]
    fn test_components() {
        let result = ExperienceScorer.score(
            &resume(vec![
                entry("Senior Software Engineer", "4 years"),
                entry("Software Developer", "2 years"),
            ]),
            &AnalysisParameters::new(),
        );
        let breakdown = result.breakdown.unwrap();
        assert_eq!(breakdown["years"], 30.0);
        assert_eq!(breakdown["seniority"], 15.0);
        assert_eq!(breakdown["variety"], 8.0);
        assert_eq!(result.score, 53.0);
    }

    #[test]
    fn test_caps_apply() {
        let entries = (0..8).map(|_| entry("Senior Architect", "12 years")).collect();
        let result = ExperienceScorer.score(&resume(entries), &AnalysisParameters::new());
        assert_eq!(result.score, 100.0);
    }

    #[test]
    fn test_huge_year_counts_saturate_at_cap() {
        let result = ExperienceScorer.score(
            &resume(vec![
                entry("Engineer", "3000000000 years"),
                entry("Developer", "3000000000 years"),
            ]),
            &AnalysisParameters::new(),
        );
        let breakdown = result.breakdown.unwrap();
        assert_eq!(breakdown["years"], 50.0);
        assert_eq!(breakdown["variety"], 8.0);
        assert_eq!(result.score, 58.0);
    }

    #[test]
    fn test_empty_short_circuit() {
        let result = ExperienceScorer.score(&resume(vec![]), &AnalysisParameters::new());
        assert_eq!(result.score, 0.0);
        assert!(result.breakdown.is_none());
        assert_eq!(result.analysis_meta["message"], "No experience found");
    }

    #[test]
    fn test_entries_without_years_still_count_for_variety() {
        let result =
            ExperienceScorer.score(&resume(vec![entry("", "")]), &AnalysisParameters::new());
        assert_eq!(result.score, 4.0);
    }
}
