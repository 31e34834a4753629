//! Statement upload handler

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::{AppError, AppState, MAX_UPLOAD_SIZE};
use tally_core::ingest::{run_ingestion, UploadedFile};

#[derive(Serialize)]
pub struct UploadResponse {
    pub import_id: String,
    pub parsed_count: usize,
}

/// POST /upload - Ingest bank statement files
///
/// Expects a multipart form with one or more `files` fields. Files without
/// the recognized document extension are skipped silently; any extraction
/// failure aborts the whole call with nothing committed.
pub async fn upload_statements(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    // Credentials are checked before any file is processed
    let extractor = state
        .extractor
        .as_ref()
        .ok_or_else(|| AppError::internal("Extraction credentials not configured"))?;

    let mut files: Vec<UploadedFile> = Vec::new();
    let mut total_size: usize = 0;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(&format!("Failed to read form field: {}", e)))?
    {
        if field.name() != Some("files") {
            continue;
        }

        let filename = field.file_name().unwrap_or("").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|_| AppError::bad_request("Failed to read file data"))?;
        total_size += bytes.len();

        if total_size > MAX_UPLOAD_SIZE {
            return Err(AppError::bad_request(&format!(
                "Upload too large. Maximum size is {} MB",
                MAX_UPLOAD_SIZE / 1024 / 1024
            )));
        }

        files.push(UploadedFile {
            filename,
            data: bytes.to_vec(),
        });
    }

    let outcome = run_ingestion(&state.ledger, extractor, &files)
        .await
        // Fatal errors name the offending file or cause
        .map_err(|e| AppError::internal(&e.to_string()))?;

    info!(
        import_id = %outcome.import_id,
        parsed_count = outcome.parsed_count,
        "Upload processed"
    );

    Ok(Json(UploadResponse {
        import_id: outcome.import_id,
        parsed_count: outcome.parsed_count,
    }))
}
