//! Fixed storage keys.

/// Global (signed-out) history list.
pub const HISTORY: &str = "promptEnhancerHistory";

/// Credential table (email to obfuscated password).
pub const USERS: &str = "promptEnhancerUsers";

/// Current session (at most one user).
pub const CURRENT_USER: &str = "promptEnhancerCurrentUser";

/// History list owned by `email`.
pub fn user_history(email: &str) -> String {
    format!("{HISTORY}_{email}")
}
