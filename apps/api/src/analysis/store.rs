//! Persistence boundary for analysis records.
//!
//! Both stores refuse to overwrite a terminal record, so once a reader has seen
//! `completed` or `failed` it never sees an earlier status again.

use std::collections::HashMap;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::{AnalysisRecord, DocumentRef};

#[async_trait]
pub trait AnalysisStore: Send + Sync {
    async fn insert(&self, record: &AnalysisRecord) -> Result<()>;

    /// Replaces a non-terminal record. Errors if the stored record is terminal.
    async fn update(&self, record: &AnalysisRecord) -> Result<()>;

    async fn get(&self, id: Uuid) -> Result<Option<AnalysisRecord>>;

    /// Newest first.
    async fn list_for_document(&self, document_id: Uuid) -> Result<Vec<AnalysisRecord>>;
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory store (no DATABASE_URL, tests)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryAnalysisStore {
    records: RwLock<HashMap<Uuid, AnalysisRecord>>,
}

impl MemoryAnalysisStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AnalysisStore for MemoryAnalysisStore {
    async fn insert(&self, record: &AnalysisRecord) -> Result<()> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.id) {
            bail!("Analysis {} already exists", record.id);
        }
        records.insert(record.id, record.clone());
        Ok(())
    }

    async fn update(&self, record: &AnalysisRecord) -> Result<()> {
        let mut records = self.records.write().await;
        let Some(existing) = records.get_mut(&record.id) else {
            bail!("Analysis {} not found", record.id);
        };
        if existing.status.is_terminal() {
            bail!("Analysis {} is already {}", record.id, existing.status);
        }
        *existing = record.clone();
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<AnalysisRecord>> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn list_for_document(&self, document_id: Uuid) -> Result<Vec<AnalysisRecord>> {
        let mut found: Vec<AnalysisRecord> = self
            .records
            .read()
            .await
            .values()
            .filter(|r| r.document_id == document_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(found)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// PostgreSQL store
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, FromRow)]
struct AnalysisRow {
    id: Uuid,
    document_id: Uuid,
    document_path: String,
    document_format: String,
    analysis_type: String,
    parameters: Value,
    status: String,
    results: Option<Value>,
    error: Option<String>,
    created_at: DateTime<Utc>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    processing_time_ms: Option<i64>,
}

impl TryFrom<AnalysisRow> for AnalysisRecord {
    type Error = anyhow::Error;

    fn try_from(row: AnalysisRow) -> Result<Self> {
        let parameters = match row.parameters {
            Value::Object(map) => map,
            Value::Null => Default::default(),
            other => bail!("Analysis {} has non-object parameters: {other}", row.id),
        };
        let results = row
            .results
            .map(serde_json::from_value)
            .transpose()
            .with_context(|| format!("Analysis {} has unreadable results", row.id))?;

        Ok(AnalysisRecord {
            id: row.id,
            document_id: row.document_id,
            document: DocumentRef {
                path: row.document_path,
                format: row.document_format,
            },
            analysis_type: row.analysis_type,
            parameters,
            status: row.status.parse()?,
            results,
            error: row.error,
            created_at: row.created_at,
            started_at: row.started_at,
            completed_at: row.completed_at,
            processing_time_ms: row.processing_time_ms,
        })
    }
}

pub struct PgAnalysisStore {
    pool: PgPool,
}

impl PgAnalysisStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn results_json(record: &AnalysisRecord) -> Result<Option<Value>> {
    record
        .results
        .as_ref()
        .map(serde_json::to_value)
        .transpose()
        .context("Failed to serialize analysis results")
}

#[async_trait]
impl AnalysisStore for PgAnalysisStore {
    async fn insert(&self, record: &AnalysisRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO analyses
                (id, document_id, document_path, document_format, analysis_type, parameters,
                 status, results, error, created_at, started_at, completed_at, processing_time_ms)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(record.id)
        .bind(record.document_id)
        .bind(&record.document.path)
        .bind(&record.document.format)
        .bind(&record.analysis_type)
        .bind(Value::Object(record.parameters.clone()))
        .bind(record.status.as_str())
        .bind(results_json(record)?)
        .bind(&record.error)
        .bind(record.created_at)
        .bind(record.started_at)
        .bind(record.completed_at)
        .bind(record.processing_time_ms)
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to insert analysis {}", record.id))?;
        Ok(())
    }

    async fn update(&self, record: &AnalysisRecord) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE analyses
            SET status = $2, results = $3, error = $4,
                started_at = $5, completed_at = $6, processing_time_ms = $7
            WHERE id = $1 AND status NOT IN ('completed', 'failed')
            "#,
        )
        .bind(record.id)
        .bind(record.status.as_str())
        .bind(results_json(record)?)
        .bind(&record.error)
        .bind(record.started_at)
        .bind(record.completed_at)
        .bind(record.processing_time_ms)
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to update analysis {}", record.id))?;

        if result.rows_affected() == 0 {
            bail!("Analysis {} is missing or already terminal", record.id);
        }
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<AnalysisRecord>> {
        let row: Option<AnalysisRow> = sqlx::query_as("SELECT * FROM analyses WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(AnalysisRecord::try_from).transpose()
    }

    async fn list_for_document(&self, document_id: Uuid) -> Result<Vec<AnalysisRecord>> {
        let rows: Vec<AnalysisRow> = sqlx::query_as(
            "SELECT * FROM analyses WHERE document_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(document_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(AnalysisRecord::try_from).collect()
    }
}
