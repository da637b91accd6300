//! Logged-in user session
//!
//! Holds only the display name returned by login, persisted under its own
//! key so a reload keeps the user signed in.

use crate::error::Result;
use crate::kv::{get_json, set_json, KeyValueStore, KEY_USER};

/// Session persisted in a key-value backend
#[derive(Debug)]
pub struct SessionStore<S: KeyValueStore> {
    kv: S,
    user: Option<String>,
}

impl<S: KeyValueStore> SessionStore<S> {
    /// Restore the session from `kv`; an unreadable entry means logged out
    pub fn load(kv: S) -> Self {
        let user = get_json::<String>(&kv, KEY_USER).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Stored session is unreadable, starting logged out");
            None
        });
        Self { kv, user }
    }

    /// Record `username` as logged in
    pub fn login(&mut self, username: impl Into<String>) -> Result<()> {
        let username = username.into();
        set_json(&mut self.kv, KEY_USER, &username)?;
        self.user = Some(username);
        Ok(())
    }

    /// Forget the current user
    pub fn logout(&mut self) -> Result<()> {
        self.user = None;
        self.kv.remove(KEY_USER)
    }

    /// Logged-in display name
    pub fn current_user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// Check whether someone is logged in
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Give back the backend
    pub fn into_inner(self) -> S {
        self.kv
    }
}
