//! Mock account domain models.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A signed-in (mock) account. The current session is at most one `User`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
}

impl User {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }
}

/// Credential table: email to obfuscated password.
///
/// The stored value is never the plaintext password. It is also not a
/// secure hash; this table backs a simulated sign-in only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialTable {
    entries: BTreeMap<String, String>,
}

impl CredentialTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, email: &str) -> bool {
        self.entries.contains_key(email)
    }

    /// Obfuscated password stored for `email`.
    pub fn get(&self, email: &str) -> Option<&str> {
        self.entries.get(email).map(String::as_str)
    }

    pub fn insert(&mut self, email: impl Into<String>, obfuscated_password: impl Into<String>) {
        self.entries.insert(email.into(), obfuscated_password.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Canonical form of an email used as a table key: trimmed, lower-cased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
