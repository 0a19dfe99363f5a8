//! History domain module.
//!
//! # Module Structure
//!
//! - `model`: History entry domain model and scope

mod model;

pub use model::{HistoryItem, HistoryScope};
