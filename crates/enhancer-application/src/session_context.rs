//! Explicit session/history context.
//!
//! Holds the state a browser UI would keep in component state: the signed-in
//! user (if any) and the history list of the active scope. `HistoryManager`
//! and `AuthService` operate on it; neither keeps state of its own.

use std::sync::Arc;

use enhancer_core::history::{HistoryItem, HistoryScope};
use enhancer_core::storage::{KeyValueStore, keys, load_typed};
use enhancer_core::user::User;

/// Session state shared by the history and auth services.
///
/// History is always available: signed out it is the global list, signed in
/// it is the user's own list.
pub struct SessionContext {
    store: Arc<dyn KeyValueStore>,
    current_user: Option<User>,
    history: Vec<HistoryItem>,
}

impl SessionContext {
    /// Restores the persisted session and loads the matching history list.
    ///
    /// Storage failures are logged and treated as "signed out, no history".
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let current_user = match load_typed::<User>(store.as_ref(), keys::CURRENT_USER) {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!("[SessionContext] Ignoring unreadable session: {}", e);
                None
            }
        };

        let mut ctx = Self::empty(store);
        ctx.current_user = current_user;
        ctx.history = load_history(ctx.store.as_ref(), &ctx.history_scope());
        tracing::debug!(
            "[SessionContext] Loaded {} history item(s) for {:?}",
            ctx.history.len(),
            ctx.history_scope()
        );
        ctx
    }

    /// A signed-out context with no history, without touching storage.
    pub fn empty(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            current_user: None,
            history: Vec::new(),
        }
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    /// The history list of the active scope, newest first.
    pub fn history(&self) -> &[HistoryItem] {
        &self.history
    }

    pub fn history_scope(&self) -> HistoryScope {
        match &self.current_user {
            Some(user) => HistoryScope::User(user.email.clone()),
            None => HistoryScope::Global,
        }
    }

    pub(crate) fn set_current_user(&mut self, user: Option<User>) {
        self.current_user = user;
    }

    pub(crate) fn history_mut(&mut self) -> &mut Vec<HistoryItem> {
        &mut self.history
    }

    pub(crate) fn replace_history(&mut self, history: Vec<HistoryItem>) {
        self.history = history;
    }
}

/// Reads the history list stored under `scope`.
///
/// Unparsable data is logged and removed so the next write starts clean.
pub(crate) fn load_history(store: &dyn KeyValueStore, scope: &HistoryScope) -> Vec<HistoryItem> {
    let key = scope.storage_key();
    match load_typed::<Vec<HistoryItem>>(store, &key) {
        Ok(history) => history.unwrap_or_default(),
        Err(e) => {
            tracing::error!("[SessionContext] Failed to parse history under {}: {}", key, e);
            if let Err(remove_err) = store.remove(&key) {
                tracing::warn!("[SessionContext] Failed to remove {}: {}", key, remove_err);
            }
            Vec::new()
        }
    }
}
