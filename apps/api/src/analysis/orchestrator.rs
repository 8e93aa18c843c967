//! Drives one analysis record from `pending` to a terminal state.
//!
//! Text extraction and scoring run on the blocking pool; the only awaits are
//! those tasks and the store writes. A panic inside either task fails the run
//! with the panic message as the record's error.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinError;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::admission::AdmissionControl;
use super::models::{AnalysisRecord, AnalysisResults, DocumentRef};
use super::store::AnalysisStore;
use crate::extraction::{DocumentSource, ExtractionError, RawDocument, TextExtractor};
use crate::models::resume::StructuredResume;
use crate::parsing::{extract_structured, panic_message};
use crate::scoring::{self, AnalysisParameters, AnalysisType, Evaluation, UnknownAnalysisType};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    UnknownAnalysisType(#[from] UnknownAnalysisType),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// Panic message of a failed scorer, verbatim.
    #[error("{0}")]
    Scoring(String),

    #[error("Analysis task aborted: {0}")]
    Aborted(String),

    #[error("Document {0} already has an analysis in progress")]
    InFlight(Uuid),

    #[error("Analysis {0} not found")]
    NotFound(Uuid),

    #[error("Failed to persist analysis: {0:#}")]
    Persistence(anyhow::Error),
}

pub struct AnalysisRequest {
    pub document_id: Uuid,
    pub document: DocumentRef,
    pub analysis_type: String,
    pub parameters: AnalysisParameters,
}

type Evaluate = fn(AnalysisType, &StructuredResume, &AnalysisParameters) -> Evaluation;

#[derive(Clone)]
pub struct Orchestrator {
    store: Arc<dyn AnalysisStore>,
    extractor: Arc<TextExtractor>,
    admission: Option<AdmissionControl>,
    document_root: PathBuf,
    evaluate: Evaluate,
}

impl Orchestrator {
    pub fn new(
        store: Arc<dyn AnalysisStore>,
        extractor: TextExtractor,
        admission: Option<AdmissionControl>,
        document_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            store,
            extractor: Arc::new(extractor),
            admission,
            document_root: document_root.into(),
            evaluate: scoring::evaluate,
        }
    }

    /// Replaces the scoring entry point.
    pub fn with_evaluate(mut self, evaluate: Evaluate) -> Self {
        self.evaluate = evaluate;
        self
    }

    /// Persists a pending record and runs it in the background.
    pub async fn submit(&self, request: AnalysisRequest) -> Result<AnalysisRecord, AnalysisError> {
        self.enqueue(AnalysisRecord::new(
            request.document_id,
            request.document,
            request.analysis_type,
            request.parameters,
        ))
        .await
    }

    /// Re-submits a previous analysis as a brand-new record.
    pub async fn reprocess(&self, id: Uuid) -> Result<AnalysisRecord, AnalysisError> {
        let previous = self
            .store
            .get(id)
            .await
            .map_err(AnalysisError::Persistence)?
            .ok_or(AnalysisError::NotFound(id))?;

        info!(analysis_id = %id, status = %previous.status, "Reprocessing analysis");
        self.enqueue(previous.retry()).await
    }

    async fn enqueue(&self, record: AnalysisRecord) -> Result<AnalysisRecord, AnalysisError> {
        let guard = match &self.admission {
            Some(admission) => Some(
                admission
                    .try_admit(record.document_id)
                    .ok_or(AnalysisError::InFlight(record.document_id))?,
            ),
            None => None,
        };

        self.store
            .insert(&record)
            .await
            .map_err(AnalysisError::Persistence)?;
        info!(
            analysis_id = %record.id,
            document_id = %record.document_id,
            analysis_type = %record.analysis_type,
            "Analysis pending"
        );

        let this = self.clone();
        let pending = record.clone();
        tokio::spawn(async move {
            // Slot released once the terminal record is persisted.
            let _guard = guard;
            this.run(pending).await;
        });

        Ok(record)
    }

    /// Runs a pending record to completion and returns the terminal record.
    pub async fn run(&self, mut record: AnalysisRecord) -> AnalysisRecord {
        if let Err(e) = record.start() {
            warn!("{e}");
            return record;
        }
        info!(analysis_id = %record.id, "Analysis processing");
        if let Err(e) = self.store.update(&record).await {
            error!(analysis_id = %record.id, "Failed to persist processing status: {e:#}");
        }

        let outcome = self.execute(&record).await;
        let transition = match outcome {
            Ok(results) => record.complete(results),
            Err(e) => {
                warn!(analysis_id = %record.id, "Analysis failed: {e}");
                record.fail(e.to_string())
            }
        };
        if let Err(e) = transition {
            error!("{e}");
            return record;
        }

        info!(
            analysis_id = %record.id,
            status = %record.status,
            processing_time_ms = record.processing_time_ms.unwrap_or_default(),
            "Analysis finished"
        );
        if let Err(e) = self.store.update(&record).await {
            error!(analysis_id = %record.id, "Failed to persist terminal status: {e:#}");
        }
        record
    }

    async fn execute(&self, record: &AnalysisRecord) -> Result<AnalysisResults, AnalysisError> {
        // Checked before any document is read.
        let analysis_type: AnalysisType = record.analysis_type.parse()?;

        let document = RawDocument::new(
            DocumentSource::Path(self.document_root.join(&record.document.path)),
            &record.document.format,
        )?;

        let extractor = Arc::clone(&self.extractor);
        let resume = tokio::task::spawn_blocking(move || {
            extractor
                .extract(&document)
                .map(|text| extract_structured(&text))
        })
        .await
        .map_err(|e| AnalysisError::Aborted(join_failure(e)))??;

        let evaluate = self.evaluate;
        let parameters = record.parameters.clone();
        let (evaluation, resume) = tokio::task::spawn_blocking(move || {
            let evaluation = evaluate(analysis_type, &resume, &parameters);
            (evaluation, resume)
        })
        .await
        .map_err(|e| AnalysisError::Scoring(join_failure(e)))?;

        Ok(AnalysisResults {
            score: evaluation.score,
            components: evaluation.components,
            extracted_data: resume,
        })
    }
}

fn join_failure(e: JoinError) -> String {
    if e.is_panic() {
        panic_message(e.into_panic().as_ref())
    } else {
        e.to_string()
    }
}
