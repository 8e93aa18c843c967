//! Dimension scorers.
//!
//! Every scorer is a pure, deterministic function of a [`StructuredResume`] and
//! the pass-through analysis parameters. `overall` composes the other three.

pub mod education;
pub mod experience;
pub mod overall;
pub mod recommendations;
pub mod skills;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::resume::StructuredResume;

pub use education::EducationScorer;
pub use experience::ExperienceScorer;
pub use overall::{OverallComponents, OverallScorer};
pub use skills::SkillsScorer;

/// Free-form key/value parameters supplied with an analysis request.
pub type AnalysisParameters = Map<String, Value>;

pub const MAX_SCORE: f64 = 100.0;

// ────────────────────────────────────────────────────────────────────────────
// Analysis type
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisType {
    Skills,
    Experience,
    Education,
    Overall,
}

impl AnalysisType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisType::Skills => "skills",
            AnalysisType::Experience => "experience",
            AnalysisType::Education => "education",
            AnalysisType::Overall => "overall",
        }
    }
}

impl fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown analysis type: {0}")]
pub struct UnknownAnalysisType(pub String);

impl FromStr for AnalysisType {
    type Err = UnknownAnalysisType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skills" => Ok(AnalysisType::Skills),
            "experience" => Ok(AnalysisType::Experience),
            "education" => Ok(AnalysisType::Education),
            "overall" => Ok(AnalysisType::Overall),
            _ => Err(UnknownAnalysisType(s.to_string())),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Score model
// ────────────────────────────────────────────────────────────────────────────

/// One dimension's result. `breakdown` is absent on the "nothing found" path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionScore {
    pub score: f64,
    pub max_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<BTreeMap<String, f64>>,
    pub recommendations: Vec<String>,
    pub analysis_meta: Map<String, Value>,
}

impl DimensionScore {
    /// Weighted path: score is the breakdown total, clamped to `[0, 100]`.
    pub fn from_breakdown(
        analysis_type: AnalysisType,
        parameters: &AnalysisParameters,
        breakdown: BTreeMap<String, f64>,
        recommendations: Vec<String>,
    ) -> Self {
        let score = breakdown.values().sum::<f64>().clamp(0.0, MAX_SCORE);
        Self {
            score,
            max_score: MAX_SCORE,
            breakdown: Some(breakdown),
            recommendations,
            analysis_meta: base_meta(analysis_type, parameters),
        }
    }

    /// Short-circuit path for a dimension with no data at all.
    pub fn nothing_found(
        analysis_type: AnalysisType,
        parameters: &AnalysisParameters,
        message: &str,
        recommendation: &str,
    ) -> Self {
        let mut analysis_meta = base_meta(analysis_type, parameters);
        analysis_meta.insert("message".to_string(), Value::from(message));
        Self {
            score: 0.0,
            max_score: MAX_SCORE,
            breakdown: None,
            recommendations: vec![recommendation.to_string()],
            analysis_meta,
        }
    }
}

fn base_meta(analysis_type: AnalysisType, parameters: &AnalysisParameters) -> Map<String, Value> {
    let mut meta = Map::new();
    meta.insert("analysis_type".to_string(), Value::from(analysis_type.as_str()));
    meta.insert("parameters".to_string(), Value::Object(parameters.clone()));
    meta
}

// ────────────────────────────────────────────────────────────────────────────
// Scorer trait + dispatch
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to add a scoring dimension. Implementations must not perform
/// I/O or read the clock.
pub trait DimensionScorer: Send + Sync {
    fn analysis_type(&self) -> AnalysisType;

    fn score(&self, resume: &StructuredResume, parameters: &AnalysisParameters) -> DimensionScore;
}

/// Result of scoring one analysis type. `components` is only set for `overall`.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub score: DimensionScore,
    pub components: Option<OverallComponents>,
}

pub fn evaluate(
    analysis_type: AnalysisType,
    resume: &StructuredResume,
    parameters: &AnalysisParameters,
) -> Evaluation {
    let single = |scorer: &dyn DimensionScorer| Evaluation {
        score: scorer.score(resume, parameters),
        components: None,
    };

    match analysis_type {
        AnalysisType::Skills => single(&SkillsScorer),
        AnalysisType::Experience => single(&ExperienceScorer),
        AnalysisType::Education => single(&EducationScorer),
        AnalysisType::Overall => {
            let (score, components) = OverallScorer.compose(resume, parameters);
            Evaluation {
                score,
                components: Some(components),
            }
        }
    }
}
