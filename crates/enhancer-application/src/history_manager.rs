//! History Manager.
//!
//! Newest-first list of successful enhancements for the active scope, with
//! immediate-duplicate suppression. Persistence failures are logged and never
//! surfaced: the in-memory list in [`SessionContext`] stays authoritative for
//! the running session.

use chrono::Utc;
use enhancer_core::history::HistoryItem;
use enhancer_core::storage::save_typed;

use crate::session_context::{SessionContext, load_history};

/// Stateless service over [`SessionContext`] history.
#[derive(Debug, Clone, Copy)]
pub struct HistoryManager {
    enabled: bool,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(true)
    }
}

impl HistoryManager {
    /// `enabled = false` turns `add` into a no-op; reads and clears still work.
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Records an enhancement at the head of the list.
    ///
    /// Returns the new item, or `None` when recording is disabled or the
    /// current head has the same raw prompt.
    pub fn add(
        &self,
        ctx: &mut SessionContext,
        raw_prompt: &str,
        modified_prompt: &str,
    ) -> Option<HistoryItem> {
        if !self.enabled {
            return None;
        }

        let head = ctx.history().first();
        if head.is_some_and(|item| item.raw_prompt == raw_prompt) {
            tracing::debug!("[HistoryManager] Skipping duplicate of the latest entry");
            return None;
        }

        let item = HistoryItem::new(
            raw_prompt,
            modified_prompt,
            Utc::now(),
            head.map(|item| item.id.as_str()),
        );
        ctx.history_mut().insert(0, item.clone());
        persist(ctx);

        tracing::info!("[HistoryManager] Added history item {}", item.id);
        Some(item)
    }

    /// The active list, newest first.
    pub fn list<'a>(&self, ctx: &'a SessionContext) -> &'a [HistoryItem] {
        ctx.history()
    }

    /// Looks up one entry of the active list by id.
    pub fn get<'a>(&self, ctx: &'a SessionContext, id: &str) -> Option<&'a HistoryItem> {
        ctx.history().iter().find(|item| item.id == id)
    }

    /// Empties the active list and removes its persisted copy.
    pub fn clear(&self, ctx: &mut SessionContext) {
        ctx.replace_history(Vec::new());

        let key = ctx.history_scope().storage_key();
        match ctx.store().remove(&key) {
            Ok(()) => tracing::info!("[HistoryManager] Cleared history ({})", key),
            Err(e) => tracing::error!("[HistoryManager] Failed to remove {}: {}", key, e),
        }
    }

    /// Re-reads the active list from storage, replacing the in-memory copy.
    pub fn reload(&self, ctx: &mut SessionContext) {
        let history = load_history(ctx.store(), &ctx.history_scope());
        ctx.replace_history(history);
    }
}

fn persist(ctx: &SessionContext) {
    let key = ctx.history_scope().storage_key();
    if let Err(e) = save_typed(ctx.store(), &key, &ctx.history()) {
        tracing::error!("[HistoryManager] Failed to save history to {}: {}", key, e);
    }
}
