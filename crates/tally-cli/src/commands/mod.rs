//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Ledger initialization
//! - `serve` - Web server command
//! - `status` - Ledger status command

pub mod core;
pub mod serve;
pub mod status;

// Re-export command functions for main.rs
pub use core::*;
pub use serve::*;
pub use status::*;
