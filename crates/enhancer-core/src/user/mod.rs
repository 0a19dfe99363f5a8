//! User domain module.
//!
//! # Module Structure
//!
//! - `model`: Mock account models (user, credential table)

mod model;

pub use model::{CredentialTable, User, normalize_email};
