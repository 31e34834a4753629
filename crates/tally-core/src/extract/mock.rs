//! Mock extraction backend for testing
//!
//! Returns canned candidate transactions without a network call. Useful for
//! unit tests and development without extraction credentials.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::models::ExtractedTransaction;

use super::{ExtractionBackend, ExtractionOutput};

/// Mock extraction backend.
///
/// Configure per-file responses with [`with_file`](Self::with_file), or a
/// shared default batch with [`with_transactions`](Self::with_transactions).
/// A failing instance reproduces the fatal-extraction-error path.
#[derive(Clone, Default)]
pub struct MockExtractor {
    default_transactions: Vec<ExtractedTransaction>,
    by_filename: HashMap<String, Vec<ExtractedTransaction>>,
    fail: bool,
}

impl MockExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to every file with this batch.
    pub fn with_transactions(transactions: Vec<ExtractedTransaction>) -> Self {
        Self {
            default_transactions: transactions,
            ..Self::default()
        }
    }

    /// Respond to one specific filename with this batch.
    pub fn with_file(mut self, filename: &str, transactions: Vec<ExtractedTransaction>) -> Self {
        self.by_filename.insert(filename.to_string(), transactions);
        self
    }

    /// Fail every extraction call.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl ExtractionBackend for MockExtractor {
    async fn extract(&self, filename: &str, _data: &[u8]) -> Result<ExtractionOutput> {
        if self.fail {
            return Err(Error::InvalidData("mock extraction failure".into()));
        }

        let transactions = self
            .by_filename
            .get(filename)
            .cloned()
            .unwrap_or_else(|| self.default_transactions.clone());

        Ok(ExtractionOutput {
            document_ref: format!("mock-doc-{}", filename),
            transactions,
        })
    }
}
