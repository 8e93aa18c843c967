use std::collections::BTreeMap;

use serde_json::Value;

use super::recommendations::{self, EDUCATION, NO_EDUCATION};
use super::{AnalysisParameters, AnalysisType, DimensionScore, DimensionScorer};
use crate::models::resume::StructuredResume;

/// Degree ladder, highest first. Anything unmatched scores as high school.
const DEGREE_LADDER: &[(&str, &[&str], f64)] = &[
    ("phd", &["phd", "ph.d", "doctorate", "doctor of"], 100.0),
    ("master", &["master", "msc", "m.sc", "mba"], 80.0),
    ("bachelor", &["bachelor", "bsc", "b.sc"], 60.0),
    ("associate", &["associate"], 40.0),
];
const HIGH_SCHOOL: (&str, f64) = ("high_school", 20.0);

pub struct EducationScorer;

impl DimensionScorer for EducationScorer {
    fn analysis_type(&self) -> AnalysisType {
        AnalysisType::Education
    }

    fn score(&self, resume: &StructuredResume, parameters: &AnalysisParameters) -> DimensionScore {
        if resume.education.is_empty() {
            return DimensionScore::nothing_found(
                self.analysis_type(),
                parameters,
                "No education found",
                NO_EDUCATION,
            );
        }

        // Maximum, not a sum: one doctorate dominates any number of lower degrees.
        let (level, highest) = resume
            .education
            .iter()
            .map(|e| degree_level(&e.degree))
            .fold(HIGH_SCHOOL, |best, next| if next.1 > best.1 { next } else { best });

        let breakdown = BTreeMap::from([("highest_degree".to_string(), highest)]);
        let mut score = DimensionScore::from_breakdown(
            self.analysis_type(),
            parameters,
            breakdown,
            recommendations::for_score(&EDUCATION, highest),
        );
        score
            .analysis_meta
            .insert("highest_degree".to_string(), Value::from(level));
        score
    }
}

fn degree_level(degree: &str) -> (&'static str, f64) {
    let lower = degree.to_lowercase();
    DEGREE_LADDER
        .iter()
        .find(|(_, keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map_or(HIGH_SCHOOL, |(level, _, score)| (*level, *score))
}
