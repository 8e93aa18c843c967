use std::path::{Component, Path as FsPath};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use super::models::{AnalysisRecord, DocumentRef};
use super::orchestrator::AnalysisRequest;
use crate::errors::AppError;
use crate::scoring::AnalysisParameters;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateAnalysisRequest {
    pub document_id: Uuid,
    pub document_path: String,
    pub format: String,
    pub analysis_type: String,
    #[serde(default)]
    pub parameters: AnalysisParameters,
}

/// POST /api/v1/analyses
pub async fn handle_create_analysis(
    State(state): State<AppState>,
    Json(req): Json<CreateAnalysisRequest>,
) -> Result<(StatusCode, Json<AnalysisRecord>), AppError> {
    validate_document_path(&req.document_path)?;
    let full_path = state.config.document_root.join(&req.document_path);
    if !tokio::fs::try_exists(&full_path).await.unwrap_or(false) {
        return Err(AppError::NotFound(format!(
            "Document '{}' not found",
            req.document_path
        )));
    }

    let record = state
        .orchestrator
        .submit(AnalysisRequest {
            document_id: req.document_id,
            document: DocumentRef {
                path: req.document_path,
                format: req.format,
            },
            analysis_type: req.analysis_type,
            parameters: req.parameters,
        })
        .await?;
    Ok((StatusCode::ACCEPTED, Json(record)))
}

/// GET /api/v1/analyses/:id
pub async fn handle_get_analysis(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AnalysisRecord>, AppError> {
    let record = state
        .store
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Analysis {id} not found")))?;
    Ok(Json(record))
}

/// POST /api/v1/analyses/:id/reprocess
pub async fn handle_reprocess(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<AnalysisRecord>), AppError> {
    let record = state.orchestrator.reprocess(id).await?;
    Ok((StatusCode::ACCEPTED, Json(record)))
}

/// GET /api/v1/documents/:document_id/analyses
pub async fn handle_list_document_analyses(
    State(state): State<AppState>,
    Path(document_id): Path<Uuid>,
) -> Result<Json<Vec<AnalysisRecord>>, AppError> {
    Ok(Json(state.store.list_for_document(document_id).await?))
}

/// Document paths are relative to the document root and may not leave it.
fn validate_document_path(path: &str) -> Result<(), AppError> {
    if path.trim().is_empty() {
        return Err(AppError::Validation("document_path must not be empty".to_string()));
    }
    let escapes = FsPath::new(path).components().any(|c| {
        matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_))
    });
    if escapes {
        return Err(AppError::Validation(format!(
            "document_path '{path}' must stay inside the document root"
        )));
    }
    Ok(())
}
