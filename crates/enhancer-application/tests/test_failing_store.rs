use std::sync::Arc;

use enhancer_application::{AuthService, HistoryManager, SessionContext};
use enhancer_core::error::{EnhancerError, Result};
use enhancer_core::storage::KeyValueStore;
use serde_json::Value as JsonValue;

/// A store that reads as empty and rejects every write.
struct ReadOnlyStore;

impl KeyValueStore for ReadOnlyStore {
    fn get(&self, _key: &str) -> Result<Option<JsonValue>> {
        Ok(None)
    }

    fn set(&self, key: &str, _value: &JsonValue) -> Result<()> {
        Err(EnhancerError::storage(format!("read-only store, cannot set {}", key)))
    }

    fn remove(&self, key: &str) -> Result<()> {
        Err(EnhancerError::storage(format!("read-only store, cannot remove {}", key)))
    }
}

fn context() -> SessionContext {
    SessionContext::load(Arc::new(ReadOnlyStore))
}

#[test]
fn test_history_stays_in_memory_when_writes_fail() {
    let mut ctx = context();
    let history = HistoryManager::default();

    assert!(history.add(&mut ctx, "p1", "m1").is_some());
    assert!(history.add(&mut ctx, "p2", "m2").is_some());

    let raws: Vec<&str> = history.list(&ctx).iter().map(|i| i.raw_prompt.as_str()).collect();
    assert_eq!(raws, vec!["p2", "p1"]);

    let id = history.list(&ctx)[1].id.clone();
    assert_eq!(history.get(&ctx, &id).map(|i| i.modified_prompt.as_str()), Some("m1"));

    history.clear(&mut ctx);
    assert!(history.list(&ctx).is_empty());
}

#[test]
fn test_auth_keeps_session_when_writes_fail() {
    let mut ctx = context();
    let auth = AuthService::new();

    let user = auth.signup(&mut ctx, "ada@example.com", "pw").unwrap();
    assert_eq!(auth.current_user(&ctx), Some(&user));
    assert!(ctx.history().is_empty());

    HistoryManager::default().add(&mut ctx, "ada prompt", "a").unwrap();
    assert_eq!(ctx.history().len(), 1);

    auth.logout(&mut ctx);
    assert!(auth.current_user(&ctx).is_none());

    let user = auth.login(&mut ctx, "sam@example.com", None).unwrap();
    assert_eq!(user.email, "sam@example.com");
    assert_eq!(auth.current_user(&ctx), Some(&user));
}
