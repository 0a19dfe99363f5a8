//! HistoryItem domain model.
//!
//! Represents one successful enhancement: the prompt as typed and the
//! prompt returned by the pipeline.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::keys;

/// One recorded enhancement.
///
/// Immutable once created. Serialized in camelCase so stored lists keep the
/// `{id, rawPrompt, modifiedPrompt, timestamp}` shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    /// Creation time in epoch milliseconds, as a string
    pub id: String,
    /// Prompt as submitted
    pub raw_prompt: String,
    /// Prompt returned by the pipeline
    pub modified_prompt: String,
    /// Creation time, ISO-8601 (UTC)
    pub timestamp: String,
}

impl HistoryItem {
    /// Creates an item stamped with `now`.
    ///
    /// `previous_id` is the id of the current list head. When it is not older
    /// than `now` (two items in the same millisecond, or a clock step back)
    /// the new id is bumped past it so ids stay unique and increasing.
    pub fn new(
        raw_prompt: impl Into<String>,
        modified_prompt: impl Into<String>,
        now: DateTime<Utc>,
        previous_id: Option<&str>,
    ) -> Self {
        let mut id = now.timestamp_millis();
        if let Some(previous) = previous_id.and_then(|p| p.parse::<i64>().ok()) {
            if previous >= id {
                id = previous + 1;
            }
        }

        Self {
            id: id.to_string(),
            raw_prompt: raw_prompt.into(),
            modified_prompt: modified_prompt.into(),
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    /// Parses the stored timestamp, if well formed.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Which history list is active.
///
/// Signed-out use reads and writes one global list; a signed-in user owns a
/// separate list keyed by email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryScope {
    Global,
    User(String),
}

impl HistoryScope {
    /// Storage key of the list for this scope.
    pub fn storage_key(&self) -> String {
        match self {
            HistoryScope::Global => keys::HISTORY.to_string(),
            HistoryScope::User(email) => keys::user_history(email),
        }
    }
}
