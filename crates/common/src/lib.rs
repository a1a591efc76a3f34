//! Mochi Common Utilities
//!
//! Shared infrastructure for all Mochi crates:
//! - Error types and result aliases
//! - Tracing/logging initialization
//! - Configuration loading (backend endpoints, download directory)

pub mod config;
pub mod error;
pub mod logging;

pub use config::*;
pub use error::*;
