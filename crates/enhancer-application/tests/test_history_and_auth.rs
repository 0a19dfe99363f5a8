use std::sync::Arc;

use enhancer_application::auth_service::reveal;
use enhancer_application::{AuthError, AuthService, HistoryManager, SessionContext};
use chrono::Utc;
use enhancer_core::history::{HistoryItem, HistoryScope};
use enhancer_core::storage::{KeyValueStore, MemoryStore, keys, save_typed};
use enhancer_core::user::CredentialTable;
use enhancer_infrastructure::JsonFileStore;
use tempfile::TempDir;

fn memory_context() -> (MemoryStore, SessionContext) {
    let store = MemoryStore::new();
    let ctx = SessionContext::load(Arc::new(store.clone()));
    (store, ctx)
}

#[test]
fn test_history_survives_reload_from_disk() {
    let temp_dir = TempDir::new().unwrap();
    let store: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::new(temp_dir.path().to_path_buf()));
    let history = HistoryManager::default();

    let mut ctx = SessionContext::load(store.clone());
    history.add(&mut ctx, "p1", "m1").unwrap();
    history.add(&mut ctx, "p2", "m2").unwrap();

    let reloaded = SessionContext::load(store.clone());
    let raws: Vec<&str> = reloaded.history().iter().map(|i| i.raw_prompt.as_str()).collect();
    assert_eq!(raws, vec!["p2", "p1"]);

    // Clear, then a fresh load sees nothing
    history.clear(&mut ctx);
    assert!(SessionContext::load(store).history().is_empty());
}

#[test]
fn test_signup_twice_fails() {
    let (_store, mut ctx) = memory_context();
    let auth = AuthService::new();

    auth.signup(&mut ctx, "ada@example.com", "first").unwrap();
    let err = auth.signup(&mut ctx, "ada@example.com", "second").unwrap_err();

    assert_eq!(err, AuthError::UserAlreadyExists);
    assert_eq!(err.to_string(), "User with this email already exists.");
}

#[test]
fn test_signup_discards_leftover_history() {
    let (store, mut ctx) = memory_context();
    let stale = vec![HistoryItem::new("old secret prompt", "old", Utc::now(), None)];
    save_typed(&store, &keys::user_history("ada@example.com"), &stale).unwrap();

    AuthService::new().signup(&mut ctx, "ada@example.com", "pw").unwrap();
    assert!(ctx.history().is_empty());
    assert!(!store.contains(&keys::user_history("ada@example.com")));

    let restarted = SessionContext::load(Arc::new(store));
    assert_eq!(restarted.current_user().map(|u| u.email.as_str()), Some("ada@example.com"));
    assert!(restarted.history().is_empty());
}

#[test]
fn test_signup_normalizes_email() {
    let (_store, mut ctx) = memory_context();
    let auth = AuthService::new();

    auth.signup(&mut ctx, " Ada@Example.com ", "pw").unwrap();
    assert_eq!(
        auth.signup(&mut ctx, "ada@example.com", "pw"),
        Err(AuthError::UserAlreadyExists)
    );
}

#[test]
fn test_signup_rejects_empty_password() {
    let (_store, mut ctx) = memory_context();
    assert_eq!(
        AuthService::new().signup(&mut ctx, "ada@example.com", ""),
        Err(AuthError::EmptyPassword)
    );
}

#[test]
fn test_wrong_password_is_rejected() {
    let (_store, mut ctx) = memory_context();
    let auth = AuthService::new();
    auth.signup(&mut ctx, "ada@example.com", "correct").unwrap();
    auth.logout(&mut ctx);

    let err = auth.login(&mut ctx, "ada@example.com", Some("wrong")).unwrap_err();
    assert_eq!(err.to_string(), "Invalid email or password.");
    assert!(auth.current_user(&ctx).is_none());

    assert_eq!(
        auth.login(&mut ctx, "nobody@example.com", Some("correct")),
        Err(AuthError::InvalidCredentials)
    );

    let user = auth.login(&mut ctx, "ada@example.com", Some("correct")).unwrap();
    assert_eq!(auth.current_user(&ctx), Some(&user));
}

#[test]
fn test_stored_password_is_not_plaintext() {
    let (store, mut ctx) = memory_context();
    AuthService::new().signup(&mut ctx, "ada@example.com", "hunter2").unwrap();

    let users: CredentialTable =
        serde_json::from_value(store.get(keys::USERS).unwrap().unwrap()).unwrap();
    let stored = users.get("ada@example.com").unwrap();
    assert_ne!(stored, "hunter2");
    assert_eq!(reveal(stored).as_deref(), Some("hunter2"));
}

#[test]
fn test_social_login_is_idempotent() {
    let (store, mut ctx) = memory_context();
    let auth = AuthService::new();

    auth.login(&mut ctx, "sam@example.com", None).unwrap();
    auth.logout(&mut ctx);
    auth.login(&mut ctx, "sam@example.com", None).unwrap();

    let users: CredentialTable =
        serde_json::from_value(store.get(keys::USERS).unwrap().unwrap()).unwrap();
    assert_eq!(users.len(), 1);

    // A social account has no password that works
    auth.logout(&mut ctx);
    assert_eq!(
        auth.login(&mut ctx, "sam@example.com", Some("")),
        Err(AuthError::InvalidCredentials)
    );
}

#[test]
fn test_history_is_scoped_per_user() {
    let (store, mut ctx) = memory_context();
    let auth = AuthService::new();
    let history = HistoryManager::default();

    history.add(&mut ctx, "global prompt", "g").unwrap();

    auth.signup(&mut ctx, "ada@example.com", "pw").unwrap();
    assert_eq!(ctx.history_scope(), HistoryScope::User("ada@example.com".into()));
    assert!(history.list(&ctx).is_empty());
    history.add(&mut ctx, "ada prompt", "a").unwrap();

    auth.logout(&mut ctx);
    assert_eq!(history.list(&ctx)[0].raw_prompt, "global prompt");
    assert!(!store.contains(keys::CURRENT_USER));

    auth.login(&mut ctx, "ada@example.com", Some("pw")).unwrap();
    assert_eq!(history.list(&ctx).len(), 1);
    assert_eq!(history.list(&ctx)[0].raw_prompt, "ada prompt");

    // Clearing only touches the active scope
    history.clear(&mut ctx);
    assert!(!store.contains(&keys::user_history("ada@example.com")));
    assert!(store.contains(keys::HISTORY));
}

#[test]
fn test_session_is_restored_on_next_load() {
    let (store, mut ctx) = memory_context();
    let auth = AuthService::new();
    auth.login(&mut ctx, "sam@example.com", None).unwrap();
    HistoryManager::default().add(&mut ctx, "p", "m").unwrap();

    let restored = SessionContext::load(Arc::new(store));
    assert_eq!(restored.current_user().map(|u| u.email.as_str()), Some("sam@example.com"));
    assert_eq!(restored.history().len(), 1);
}

#[test]
fn test_logout_when_signed_out_is_noop() {
    let (_store, mut ctx) = memory_context();
    AuthService::new().logout(&mut ctx);
    assert!(ctx.current_user().is_none());
}
