//! Mock Auth Service.
//!
//! Simulated sign-in over a credential table in the key-value store. The
//! password "obfuscation" is a reversible encoding and provides no security
//! whatsoever; it only keeps the stored value from being the literal
//! plaintext.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use enhancer_core::storage::{keys, load_typed, save_typed};
use enhancer_core::user::{CredentialTable, User, normalize_email};
use thiserror::Error;

use crate::session_context::{SessionContext, load_history};

/// Suffix appended to the encoded password.
pub const OBFUSCATION_SUFFIX: &str = "_mock_obfuscated";

/// Auth-logic failures, shown inline next to the auth form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("User with this email already exists.")]
    UserAlreadyExists,

    #[error("Invalid email or password.")]
    InvalidCredentials,

    #[error("Please enter a valid email address.")]
    InvalidEmail,

    #[error("Password cannot be empty.")]
    EmptyPassword,
}

/// Encodes a password for the credential table. Not a hash.
pub fn obfuscate(password: &str) -> String {
    format!("{}{}", BASE64_STANDARD.encode(password), OBFUSCATION_SUFFIX)
}

/// Inverse of [`obfuscate`]. Returns `None` for values it did not produce.
pub fn reveal(obfuscated: &str) -> Option<String> {
    let encoded = obfuscated.strip_suffix(OBFUSCATION_SUFFIX)?;
    let bytes = BASE64_STANDARD.decode(encoded).ok()?;
    String::from_utf8(bytes).ok()
}

/// Stateless auth operations over a [`SessionContext`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthService;

impl AuthService {
    pub fn new() -> Self {
        Self
    }

    /// Creates an account and signs it in with an empty history.
    pub fn signup(
        &self,
        ctx: &mut SessionContext,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let email = validated_email(email)?;
        if password.is_empty() {
            return Err(AuthError::EmptyPassword);
        }

        let mut users = load_users(ctx);
        if users.contains(&email) {
            return Err(AuthError::UserAlreadyExists);
        }

        users.insert(email.clone(), obfuscate(password));
        save_users(ctx, &users);

        let user = User::new(email);
        start_session(ctx, user.clone());
        // A fresh account never inherits entries left under its key
        if let Err(e) = ctx.store().remove(&keys::user_history(&user.email)) {
            tracing::error!("[AuthService] Failed to reset history: {}", e);
        }
        ctx.replace_history(Vec::new());

        tracing::info!("[AuthService] Signed up {}", user.email);
        Ok(user)
    }

    /// Signs in.
    ///
    /// With a password the account must exist and the password must match.
    /// Without one (the social flow) the account is created on first use and
    /// the call always succeeds.
    pub fn login(
        &self,
        ctx: &mut SessionContext,
        email: &str,
        password: Option<&str>,
    ) -> Result<User, AuthError> {
        let email = validated_email(email)?;
        let mut users = load_users(ctx);

        match password {
            Some(password) => {
                let matches = !password.is_empty()
                    && users.get(&email) == Some(obfuscate(password).as_str());
                if !matches {
                    tracing::debug!("[AuthService] Rejected login for {}", email);
                    return Err(AuthError::InvalidCredentials);
                }
            }
            None => {
                if !users.contains(&email) {
                    // Social accounts have no usable password
                    users.insert(email.clone(), obfuscate(""));
                    save_users(ctx, &users);
                    tracing::info!("[AuthService] Provisioned social account {}", email);
                }
            }
        }

        let user = User::new(email);
        start_session(ctx, user.clone());
        let history = load_history(ctx.store(), &ctx.history_scope());
        ctx.replace_history(history);

        tracing::info!("[AuthService] Logged in {}", user.email);
        Ok(user)
    }

    /// Ends the session and switches back to the global history.
    ///
    /// The credential table and the user's history stay in storage.
    pub fn logout(&self, ctx: &mut SessionContext) {
        let Some(user) = ctx.current_user().cloned() else {
            return;
        };

        ctx.set_current_user(None);
        if let Err(e) = ctx.store().remove(keys::CURRENT_USER) {
            tracing::error!("[AuthService] Failed to clear session: {}", e);
        }

        let history = load_history(ctx.store(), &ctx.history_scope());
        ctx.replace_history(history);
        tracing::info!("[AuthService] Logged out {}", user.email);
    }

    pub fn current_user<'a>(&self, ctx: &'a SessionContext) -> Option<&'a User> {
        ctx.current_user()
    }
}

fn validated_email(email: &str) -> Result<String, AuthError> {
    let email = normalize_email(email);
    if email.is_empty() || !email.contains('@') {
        return Err(AuthError::InvalidEmail);
    }
    Ok(email)
}

fn load_users(ctx: &SessionContext) -> CredentialTable {
    match load_typed::<CredentialTable>(ctx.store(), keys::USERS) {
        Ok(users) => users.unwrap_or_default(),
        Err(e) => {
            tracing::error!("[AuthService] Failed to read credential table: {}", e);
            CredentialTable::default()
        }
    }
}

fn save_users(ctx: &SessionContext, users: &CredentialTable) {
    if let Err(e) = save_typed(ctx.store(), keys::USERS, users) {
        tracing::error!("[AuthService] Failed to save credential table: {}", e);
    }
}

fn start_session(ctx: &mut SessionContext, user: User) {
    if let Err(e) = save_typed(ctx.store(), keys::CURRENT_USER, &user) {
        tracing::error!("[AuthService] Failed to save session: {}", e);
    }
    ctx.set_current_user(Some(user));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_obfuscation_is_reversible_and_not_plaintext() {
        let stored = obfuscate("hunter2");
        assert_eq!(stored, "aHVudGVyMg==_mock_obfuscated");
        assert_ne!(stored, "hunter2");
        assert_eq!(reveal(&stored).as_deref(), Some("hunter2"));
    }

    #[test]
    fn test_reveal_rejects_foreign_values() {
        assert_eq!(reveal("plain"), None);
        assert_eq!(reveal("!!!_mock_obfuscated"), None);
    }

    #[test]
    fn test_email_validation() {
        assert_eq!(validated_email("  Ada@Example.COM "), Ok("ada@example.com".into()));
        assert_eq!(validated_email("   "), Err(AuthError::InvalidEmail));
        assert_eq!(validated_email("not-an-email"), Err(AuthError::InvalidEmail));
    }
}
