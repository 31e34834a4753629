//! Tally Web Server
//!
//! Axum-based REST API for the Tally spending dashboard:
//! - `POST /upload` — ingest bank statement PDFs
//! - `GET /transactions` — date-range filtered transaction list
//! - `GET /summary/{daily,weekly,monthly,category}` — bucketed totals
//! - `GET /recurring` — transactions flagged by the recurrence detector
//!
//! State mutation is serialized by the ledger's single-writer lock; every
//! handler reads a consistent snapshot.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use tally_core::extract::ExtractorClient;
use tally_core::store::Ledger;

mod handlers;

/// Maximum total upload size per call (10 MB)
pub const MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024;

/// Server configuration
#[derive(Clone, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
}

/// Shared application state
pub struct AppState {
    pub ledger: Ledger,
    /// Extraction collaborator; `None` when credentials are missing, in
    /// which case uploads fail before any file is processed
    pub extractor: Option<ExtractorClient>,
}

/// Create the application router
pub fn create_router(ledger: Ledger, config: ServerConfig) -> Router {
    let extractor = ExtractorClient::from_env();
    match extractor {
        Some(_) => info!("Extraction backend configured"),
        None => warn!("Extraction credentials not configured (set OPENAI_API_KEY); uploads will fail"),
    }
    create_router_with_options(ledger, config, extractor)
}

/// Create the application router with an explicit extractor (for testing)
pub fn create_router_with_options(
    ledger: Ledger,
    config: ServerConfig,
    extractor: Option<ExtractorClient>,
) -> Router {
    let state = Arc::new(AppState { ledger, extractor });

    let routes = Router::new()
        .route("/upload", post(handlers::upload_statements))
        .route("/transactions", get(handlers::list_transactions))
        .route("/recurring", get(handlers::list_recurring))
        .route("/summary/daily", get(handlers::summary_daily))
        .route("/summary/weekly", get(handlers::summary_weekly))
        .route("/summary/monthly", get(handlers::summary_monthly))
        .route("/summary/category", get(handlers::summary_category));

    // Build CORS layer
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    };

    routes
        .with_state(state)
        // The handler enforces the cumulative cap; this lets bodies that
        // size actually reach it
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Start the server
pub async fn serve(
    ledger: Ledger,
    host: &str,
    port: u16,
    config: ServerConfig,
) -> anyhow::Result<()> {
    let app = create_router(ledger, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn internal(msg: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            internal: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}

#[cfg(test)]
mod tests;
