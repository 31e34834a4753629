//! Document extraction collaborator
//!
//! Turns the bytes of an uploaded bank statement into candidate
//! transactions. The engine treats extraction as an external collaborator:
//! one async call per document, fatal error on failure, no retry.
//!
//! # Architecture
//!
//! - `ExtractionBackend` trait: the interface for all extraction backends
//! - `ExtractorClient` enum: concrete wrapper providing Clone + compile-time
//!   dispatch
//! - Backend implementations: `OpenAiExtractor`, `MockExtractor`
//!
//! # Configuration
//!
//! Environment variables:
//! - `OPENAI_API_KEY`: API key (required; without it no extractor is built)
//! - `OPENAI_MODEL`: Model name (default: gpt-4o)
//! - `OPENAI_BASE_URL`: API base URL (default: https://api.openai.com)

mod mock;
mod openai;

pub use mock::MockExtractor;
pub use openai::OpenAiExtractor;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::ExtractedTransaction;

/// Result of extracting one document.
#[derive(Debug, Clone)]
pub struct ExtractionOutput {
    /// Opaque reference to the externally-stored document
    pub document_ref: String,
    pub transactions: Vec<ExtractedTransaction>,
}

/// Interface for document extraction backends.
#[async_trait]
pub trait ExtractionBackend: Send + Sync {
    /// Extract candidate transactions from a statement document.
    async fn extract(&self, filename: &str, data: &[u8]) -> Result<ExtractionOutput>;
}

/// Concrete extraction client with compile-time dispatch.
#[derive(Clone)]
pub enum ExtractorClient {
    OpenAi(OpenAiExtractor),
    Mock(MockExtractor),
}

impl ExtractorClient {
    /// Build a client from environment variables, if credentials are set.
    pub fn from_env() -> Option<Self> {
        OpenAiExtractor::from_env().map(Self::OpenAi)
    }

    pub async fn extract(&self, filename: &str, data: &[u8]) -> Result<ExtractionOutput> {
        match self {
            Self::OpenAi(backend) => backend.extract(filename, data).await,
            Self::Mock(backend) => backend.extract(filename, data).await,
        }
    }
}
