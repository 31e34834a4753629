//! Ingestion orchestration
//!
//! One pass per upload call: per-file extraction, per-record refinement,
//! whole-call recurrence detection, identifier assignment, then a single
//! commit. Commit is the last step, so an extraction failure anywhere in
//! the call leaves the ledger untouched.

use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::extract::ExtractorClient;
use crate::models::{Import, NewTransaction};
use crate::recurring::detect_recurring;
use crate::refine::refine_category;
use crate::store::Ledger;
use crate::time::now_reference;

/// The one recognized statement document extension.
pub const RECOGNIZED_EXTENSION: &str = ".pdf";

/// One uploaded file, already read into memory.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Result of one ingestion call.
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub import_id: String,
    /// Total transactions extracted across all processed files
    pub parsed_count: usize,
}

/// Ingest one upload call's files into the ledger.
///
/// Files without the recognized extension are skipped silently. Any
/// extraction failure, or a malformed extracted record, aborts the whole
/// call with nothing committed.
pub async fn run_ingestion(
    ledger: &Ledger,
    extractor: &ExtractorClient,
    files: &[UploadedFile],
) -> Result<IngestOutcome> {
    let import_id = Uuid::new_v4().to_string();

    let mut batch: Vec<NewTransaction> = Vec::new();
    let mut imports: Vec<Import> = Vec::new();

    for file in files {
        if !file.filename.ends_with(RECOGNIZED_EXTENSION) {
            debug!(filename = %file.filename, "Skipping unrecognized file type");
            continue;
        }

        let output = extractor
            .extract(&file.filename, &file.data)
            .await
            .map_err(|e| Error::Extraction {
                filename: file.filename.clone(),
                message: e.to_string(),
            })?;

        let file_count = output.transactions.len();
        for candidate in output.transactions {
            candidate.validate().map_err(|e| Error::Extraction {
                filename: file.filename.clone(),
                message: e.to_string(),
            })?;

            let category =
                refine_category(&candidate.description, candidate.category, candidate.confidence);

            batch.push(NewTransaction {
                date: candidate.date,
                description: candidate.description,
                amount: candidate.amount,
                merchant_canonical: candidate.merchant_canonical,
                category,
                confidence: candidate.confidence,
                recurring: false,
            });
        }

        imports.push(Import {
            import_id: import_id.clone(),
            filename: file.filename.clone(),
            document_ref: output.document_ref,
            transaction_count: file_count,
            created_at: now_reference().to_rfc3339(),
        });
    }

    // Recurrence is evaluated over the whole call's batch, not per file
    detect_recurring(&mut batch);

    let parsed_count = batch.len();
    let transactions = batch
        .into_iter()
        .map(|tx| tx.into_transaction(Uuid::new_v4().to_string(), import_id.clone()))
        .collect();

    ledger.commit_import(transactions, imports)?;

    info!(
        %import_id,
        files = files.len(),
        parsed_count,
        "Ingestion committed"
    );

    Ok(IngestOutcome {
        import_id,
        parsed_count,
    })
}
