use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::recommendations;
use super::{
    AnalysisParameters, AnalysisType, DimensionScore, DimensionScorer, EducationScorer,
    ExperienceScorer, SkillsScorer,
};
use crate::models::resume::StructuredResume;

/// Weights in percent; they sum to 100.
const SKILLS_WEIGHT: f64 = 35.0;
const EXPERIENCE_WEIGHT: f64 = 40.0;
const EDUCATION_WEIGHT: f64 = 25.0;

/// The three sub-scores behind an overall score, plus its band label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallComponents {
    pub skills: DimensionScore,
    pub experience: DimensionScore,
    pub education: DimensionScore,
    pub summary: String,
}

pub struct OverallScorer;

impl OverallScorer {
    pub fn compose(
        &self,
        resume: &StructuredResume,
        parameters: &AnalysisParameters,
    ) -> (DimensionScore, OverallComponents) {
        let skills = SkillsScorer.score(resume, parameters);
        let experience = ExperienceScorer.score(resume, parameters);
        let education = EducationScorer.score(resume, parameters);

        let score = weighted_overall(skills.score, experience.score, education.score);
        let summary = summary_band(score).to_string();

        let breakdown = BTreeMap::from([
            ("skills".to_string(), skills.score),
            ("experience".to_string(), experience.score),
            ("education".to_string(), education.score),
        ]);

        let mut analysis_meta = serde_json::Map::new();
        analysis_meta.insert("analysis_type".to_string(), Value::from(AnalysisType::Overall.as_str()));
        analysis_meta.insert("parameters".to_string(), Value::Object(parameters.clone()));
        analysis_meta.insert("summary".to_string(), Value::from(summary.as_str()));
        analysis_meta.insert(
            "weights".to_string(),
            json!({
                "skills": SKILLS_WEIGHT / 100.0,
                "experience": EXPERIENCE_WEIGHT / 100.0,
                "education": EDUCATION_WEIGHT / 100.0,
            }),
        );

        let overall = DimensionScore {
            score,
            max_score: super::MAX_SCORE,
            breakdown: Some(breakdown),
            recommendations: recommendations::union([
                skills.recommendations.as_slice(),
                experience.recommendations.as_slice(),
                education.recommendations.as_slice(),
            ]),
            analysis_meta,
        };

        (
            overall,
            OverallComponents {
                skills,
                experience,
                education,
                summary,
            },
        )
    }
}

impl DimensionScorer for OverallScorer {
    fn analysis_type(&self) -> AnalysisType {
        AnalysisType::Overall
    }

    fn score(&self, resume: &StructuredResume, parameters: &AnalysisParameters) -> DimensionScore {
        self.compose(resume, parameters).0
    }
}

/// `round(0.35·skills + 0.40·experience + 0.25·education)`, halves rounded up.
/// Summed in hundredths so that exact halves such as 28.5 stay exact.
pub fn weighted_overall(skills: f64, experience: f64, education: f64) -> f64 {
    let hundredths =
        skills * SKILLS_WEIGHT + experience * EXPERIENCE_WEIGHT + education * EDUCATION_WEIGHT;
    (hundredths / 100.0).round().clamp(0.0, super::MAX_SCORE)
}

pub fn summary_band(score: f64) -> &'static str {
    if score >= 80.0 {
        "excellent"
    } else if score >= 60.0 {
        "good"
    } else if score >= 40.0 {
        "fair"
    } else {
        "needs improvement"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{EducationEntry, ExperienceEntry};

    #[test]
    fn test_weighted_rounding_half_up() {
        assert_eq!(weighted_overall(10.0, 0.0, 100.0), 29.0);
        assert_eq!(weighted_overall(100.0, 100.0, 100.0), 100.0);
        assert_eq!(weighted_overall(0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_summary_bands() {
        assert_eq!(summary_band(80.0), "excellent");
        assert_eq!(summary_band(79.0), "good");
        assert_eq!(summary_band(60.0), "good");
        assert_eq!(summary_band(40.0), "fair");
        assert_eq!(summary_band(39.0), "needs improvement");
    }

    #[test]
    fn test_compose_uses_sub_scores_and_unions_recommendations() {
        let mut resume = StructuredResume::default();
        resume.education.push(EducationEntry {
            degree: "PhD".to_string(),
            ..Default::default()
        });
        resume.experience.push(ExperienceEntry {
            title: "Engineer".to_string(),
            ..Default::default()
        });

        let (overall, components) = OverallScorer.compose(&resume, &AnalysisParameters::new());
        assert_eq!(components.skills.score, 0.0);
        assert_eq!(components.experience.score, 4.0);
        assert_eq!(components.education.score, 100.0);
        // round(0 + 1.6 + 25)
        assert_eq!(overall.score, 27.0);
        assert_eq!(components.summary, "needs improvement");
        assert_eq!(overall.analysis_meta["summary"], "needs improvement");

        let mut expected = components.skills.recommendations.clone();
        for r in components
            .experience
            .recommendations
            .iter()
            .chain(&components.education.recommendations)
        {
            if !expected.contains(r) {
                expected.push(r.clone());
            }
        }
        assert_eq!(overall.recommendations, expected);
    }

    #[test]
    fn test_union_collapses_shared_messages() {
        let resume = StructuredResume::default();
        let (overall, components) = OverallScorer.compose(&resume, &AnalysisParameters::new());
        let total = components.skills.recommendations.len()
            + components.experience.recommendations.len()
            + components.education.recommendations.len();
        assert!(overall.recommendations.len() <= total);
        let mut sorted = overall.recommendations.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), overall.recommendations.len());
    }
}
