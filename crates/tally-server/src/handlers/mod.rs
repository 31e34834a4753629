//! HTTP request handlers organized by domain

pub mod summaries;
pub mod transactions;
pub mod upload;

// Re-export all handlers for use in router
pub use summaries::*;
pub use transactions::*;
pub use upload::*;
