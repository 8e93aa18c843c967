use std::collections::BTreeMap;

use super::recommendations::{self, NO_SKILLS, SKILLS};
use super::{AnalysisParameters, AnalysisType, DimensionScore, DimensionScorer};
use crate::models::resume::StructuredResume;

/// Per-category caps sum to 100.
const TECHNICAL_CAP: f64 = 40.0;
const TOOLS_FRAMEWORKS_CAP: f64 = 25.0;
const DATABASES_CAP: f64 = 15.0;
const LANGUAGES_CAP: f64 = 20.0;

pub struct SkillsScorer;

impl DimensionScorer for SkillsScorer {
    fn analysis_type(&self) -> AnalysisType {
        AnalysisType::Skills
    }

    fn score(&self, resume: &StructuredResume, parameters: &AnalysisParameters) -> DimensionScore {
        let skills = &resume.skills;
        if skills.technical.is_empty() {
            return DimensionScore::nothing_found(
                self.analysis_type(),
                parameters,
                "No skills found",
                NO_SKILLS,
            );
        }

        let technical = (skills.technical.len() as f64 * 2.0).min(TECHNICAL_CAP);
        let tools_frameworks =
            ((skills.tools.len() + skills.frameworks.len()) as f64 * 1.5).min(TOOLS_FRAMEWORKS_CAP);
        let databases = (skills.databases.len() as f64 * 3.0).min(DATABASES_CAP);
        let languages = (skills.languages.len() as f64 * 2.0).min(LANGUAGES_CAP);

        let breakdown = BTreeMap::from([
            ("technical".to_string(), technical),
            ("tools_frameworks".to_string(), tools_frameworks),
            ("databases".to_string(), databases),
            ("languages".to_string(), languages),
        ]);
        let total = technical + tools_frameworks + databases + languages;

        DimensionScore::from_breakdown(
            self.analysis_type(),
            parameters,
            breakdown,
            recommendations::for_score(&SKILLS, total),
        )
    }
}
