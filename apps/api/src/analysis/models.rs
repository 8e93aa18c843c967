use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::resume::StructuredResume;
use crate::scoring::{AnalysisParameters, DimensionScore, OverallComponents};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl AnalysisStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisStatus::Pending => "pending",
            AnalysisStatus::Processing => "processing",
            AnalysisStatus::Completed => "completed",
            AnalysisStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AnalysisStatus::Completed | AnalysisStatus::Failed)
    }
}

impl fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(AnalysisStatus::Pending),
            "processing" => Ok(AnalysisStatus::Processing),
            "completed" => Ok(AnalysisStatus::Completed),
            "failed" => Ok(AnalysisStatus::Failed),
            other => anyhow::bail!("Unknown analysis status '{other}'"),
        }
    }
}

/// Where the upload collaborator stored the document, relative to the
/// document root, and the format tag it declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub path: String,
    pub format: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResults {
    pub score: DimensionScore,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<OverallComponents>,
    pub extracted_data: StructuredResume,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Analysis {id} cannot move from {from} to {to}")]
pub struct TransitionError {
    pub id: Uuid,
    pub from: AnalysisStatus,
    pub to: AnalysisStatus,
}

/// One analysis run.
///
/// `pending → processing → completed | failed`. Terminal records are never
/// modified; a retry is a new record created by [`AnalysisRecord::retry`].
/// `results` and `error` are never both set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: Uuid,
    pub document_id: Uuid,
    pub document: DocumentRef,
    /// Kept as submitted; an unrecognised type fails the run, not the request.
    pub analysis_type: String,
    pub parameters: AnalysisParameters,
    pub status: AnalysisStatus,
    pub results: Option<AnalysisResults>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub processing_time_ms: Option<i64>,
}

impl AnalysisRecord {
    pub fn new(
        document_id: Uuid,
        document: DocumentRef,
        analysis_type: impl Into<String>,
        parameters: AnalysisParameters,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id,
            document,
            analysis_type: analysis_type.into(),
            parameters,
            status: AnalysisStatus::Pending,
            results: None,
            error: None,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            processing_time_ms: None,
        }
    }

    /// A fresh pending record for the same document, type and parameters.
    pub fn retry(&self) -> Self {
        Self::new(
            self.document_id,
            self.document.clone(),
            self.analysis_type.clone(),
            self.parameters.clone(),
        )
    }

    pub fn start(&mut self) -> Result<(), TransitionError> {
        self.transition(AnalysisStatus::Pending, AnalysisStatus::Processing)?;
        self.started_at = Some(Utc::now());
        Ok(())
    }

    pub fn complete(&mut self, results: AnalysisResults) -> Result<(), TransitionError> {
        self.transition(AnalysisStatus::Processing, AnalysisStatus::Completed)?;
        self.results = Some(results);
        self.finish();
        Ok(())
    }

    pub fn fail(&mut self, error: impl Into<String>) -> Result<(), TransitionError> {
        self.transition(AnalysisStatus::Processing, AnalysisStatus::Failed)?;
        self.error = Some(error.into());
        self.finish();
        Ok(())
    }

    fn transition(&mut self, from: AnalysisStatus, to: AnalysisStatus) -> Result<(), TransitionError> {
        if self.status != from {
            return Err(TransitionError {
                id: self.id,
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }

    fn finish(&mut self) {
        let completed_at = Utc::now();
        self.processing_time_ms = self
            .started_at
            .map(|started| (completed_at - started).num_milliseconds());
        self.completed_at = Some(completed_at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending() -> AnalysisRecord {
        AnalysisRecord::new(
            Uuid::new_v4(),
            DocumentRef {
                path: "cv.txt".to_string(),
                format: "txt".to_string(),
            },
            "skills",
            AnalysisParameters::new(),
        )
    }

    #[test]
    fn test_happy_path_timestamps() {
        let mut record = pending();
        assert_eq!(record.status, AnalysisStatus::Pending);
        assert!(record.started_at.is_none());

        record.start().unwrap();
        assert_eq!(record.status, AnalysisStatus::Processing);
        assert!(record.started_at.is_some());
        assert!(record.completed_at.is_none());

        record.fail("boom").unwrap();
        assert_eq!(record.status, AnalysisStatus::Failed);
        assert_eq!(record.error.as_deref(), Some("boom"));
        assert!(record.results.is_none());
        assert!(record.completed_at.is_some());
        assert!(record.processing_time_ms.is_some_and(|ms| ms >= 0));
    }

    #[test]
    fn test_cannot_skip_processing() {
        let mut record = pending();
        let err = record.fail("nope").unwrap_err();
        assert_eq!(err.from, AnalysisStatus::Pending);
        assert_eq!(err.to, AnalysisStatus::Failed);
        assert_eq!(record.status, AnalysisStatus::Pending);
        assert!(record.error.is_none());
    }

    #[test]
    fn test_terminal_state_is_final() {
        let mut record = pending();
        record.start().unwrap();
        record.fail("first").unwrap();
        let completed_at = record.completed_at;

        assert!(record.start().is_err());
        assert!(record.fail("second").is_err());
        assert_eq!(record.error.as_deref(), Some("first"));
        assert_eq!(record.completed_at, completed_at);
    }

    #[test]
    fn test_retry_is_a_new_pending_record() {
        let mut record = pending();
        record.start().unwrap();
        record.fail("decode").unwrap();

        let retry = record.retry();
        assert_ne!(retry.id, record.id);
        assert_eq!(retry.status, AnalysisStatus::Pending);
        assert_eq!(retry.document_id, record.document_id);
        assert_eq!(retry.document, record.document);
        assert_eq!(retry.analysis_type, record.analysis_type);
        assert!(retry.error.is_none());
        assert_eq!(record.status, AnalysisStatus::Failed);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(serde_json::to_value(AnalysisStatus::Processing).unwrap(), "processing");
        assert_eq!("failed".parse::<AnalysisStatus>().unwrap(), AnalysisStatus::Failed);
        assert!("done".parse::<AnalysisStatus>().is_err());
    }
}
