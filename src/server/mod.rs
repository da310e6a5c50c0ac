/*!
 * HTTP front end.
 *
 * - `GET /` and `POST /translate`: HTML form and result pages
 * - `POST /api/translate`: JSON translation requests
 * - `POST /api/translate/pdf`: multipart PDF uploads
 * - `GET /api/languages`, `GET /api/health`
 */

use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use log::info;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::translation::TranslationPipeline;

pub mod handlers;
pub mod pages;

/// Shared state of the HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<TranslationPipeline>,
}

impl AppState {
    pub fn new(pipeline: Arc<TranslationPipeline>) -> Self {
        Self { pipeline }
    }
}

/// Build the application router
pub fn create_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        // HTML pages
        .route("/", get(handlers::index))
        .route("/translate", post(handlers::translate_form))

        // JSON API
        .route("/api/translate", post(handlers::translate_json))
        .route("/api/translate/pdf", post(handlers::translate_pdf))
        .route("/api/languages", get(handlers::languages))
        .route("/api/health", get(handlers::health_check))

        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind `host:port` and serve until the process is stopped
pub async fn serve(state: AppState, host: &str, port: u16, max_upload_bytes: usize) -> Result<()> {
    let app = create_router(state, max_upload_bytes);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Starting server on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
