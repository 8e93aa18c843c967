use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .context("Failed to connect to PostgreSQL")?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Creates the analyses table and its document index if missing.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS analyses (
            id                 UUID PRIMARY KEY,
            document_id        UUID NOT NULL,
            document_path      TEXT NOT NULL,
            document_format    TEXT NOT NULL,
            analysis_type      TEXT NOT NULL,
            parameters         JSONB NOT NULL DEFAULT '{}'::jsonb,
            status             TEXT NOT NULL,
            results            JSONB,
            error              TEXT,
            created_at         TIMESTAMPTZ NOT NULL,
            started_at         TIMESTAMPTZ,
            completed_at       TIMESTAMPTZ,
            processing_time_ms BIGINT,
            CHECK (results IS NULL OR error IS NULL)
        )
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create analyses table")?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS analyses_document_idx ON analyses (document_id, created_at DESC)",
    )
    .execute(pool)
    .await
    .context("Failed to create analyses index")?;

    info!("Database schema ready");
    Ok(())
}
