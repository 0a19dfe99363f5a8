//! Domain layer for the Prompt Enhancer.
//!
//! Models (history entries, mock accounts), ports (key-value storage, text
//! generation, secrets), configuration types and the fenced-block parser.

pub mod config;
pub mod error;
pub mod fence;
pub mod generation;
pub mod history;
pub mod secret;
pub mod storage;
pub mod user;

// Re-export common error type
pub use error::EnhancerError;
