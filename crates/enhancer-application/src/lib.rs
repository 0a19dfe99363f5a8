//! Application layer for Prompt Enhancer.
//!
//! Use cases that coordinate the domain models in `enhancer-core` with a
//! `TextGenerator` and a `KeyValueStore`: the enhancement pipeline, prompt
//! history and the mock sign-in flow.

pub mod auth_service;
pub mod history_manager;
pub mod instructions;
pub mod prompt_enhancer;
pub mod session_context;

pub use auth_service::{AuthError, AuthService};
pub use history_manager::HistoryManager;
pub use prompt_enhancer::{EnhanceError, PromptEnhancer};
pub use session_context::SessionContext;
