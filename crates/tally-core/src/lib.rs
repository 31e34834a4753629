//! Tally Core Library
//!
//! Shared functionality for the Tally spending dashboard:
//! - Domain models with a closed category set
//! - Confidence-gated category refinement
//! - Recurring transaction detection
//! - Daily/weekly/monthly/category summary aggregation
//! - Single-writer JSON ledger store
//! - Pluggable document extraction backends (OpenAI, mock)
//! - Ingestion orchestration

pub mod error;
pub mod extract;
pub mod ingest;
pub mod models;
pub mod recurring;
pub mod refine;
pub mod store;
pub mod summary;
pub mod time;

pub use error::{Error, Result};
pub use extract::{ExtractionBackend, ExtractorClient, MockExtractor, OpenAiExtractor};
pub use ingest::{run_ingestion, IngestOutcome, UploadedFile};
pub use models::{Category, Import, LedgerState, Transaction};
pub use recurring::detect_recurring;
pub use refine::refine_category;
pub use store::Ledger;
pub use summary::{CategoryTotals, PeriodTotals};
