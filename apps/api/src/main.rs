mod analysis;
mod config;
mod db;
mod errors;
mod extraction;
mod models;
mod parsing;
mod routes;
mod scoring;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::admission::AdmissionControl;
use crate::analysis::orchestrator::Orchestrator;
use crate::analysis::store::{AnalysisStore, MemoryAnalysisStore, PgAnalysisStore};
use crate::config::Config;
use crate::db::{create_pool, ensure_schema};
use crate::extraction::{DocumentFormat, TextExtractor};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CV analysis API v{}", env!("CARGO_PKG_VERSION"));

    // Analysis record storage
    let store: Arc<dyn AnalysisStore> = match &config.database_url {
        Some(url) => {
            let pool = create_pool(url).await?;
            ensure_schema(&pool).await?;
            Arc::new(PgAnalysisStore::new(pool))
        }
        None => {
            info!("DATABASE_URL not set; analysis records are kept in memory");
            Arc::new(MemoryAnalysisStore::new())
        }
    };

    let extractor = TextExtractor::default();
    let formats: Vec<&str> = [
        DocumentFormat::Pdf,
        DocumentFormat::Doc,
        DocumentFormat::Docx,
        DocumentFormat::Txt,
        DocumentFormat::Rtf,
    ]
    .into_iter()
    .filter(|f| extractor.supports(*f))
    .map(|f| f.as_str())
    .collect();
    info!("Text decoders registered: {}", formats.join(", "));

    tokio::fs::create_dir_all(&config.document_root)
        .await
        .with_context(|| format!("Cannot create document root {}", config.document_root.display()))?;
    info!("Document root: {}", config.document_root.display());

    let admission = config.single_flight_analyses.then(AdmissionControl::new);
    let orchestrator = Orchestrator::new(
        store.clone(),
        extractor,
        admission,
        config.document_root.clone(),
    );

    let state = AppState {
        store,
        orchestrator,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
