//! Session variables from the request context.

use std::collections::HashMap;

use crate::actor::UserRef;

pub const USER_ID: &str = "x-library-user-id";
pub const USER_NAME: &str = "x-library-user-name";
pub const ROLE: &str = "x-library-role";

/// Parsed session variables from the incoming request.
///
/// Over HTTP these are the request headers, so a librarian identifies
/// themselves with:
///
/// ```text
/// x-library-user-id: librarian-7
/// x-library-user-name: Ada
/// x-library-role: librarian
/// ```
#[derive(Debug, Clone, Default)]
pub struct Session {
    variables: HashMap<String, String>,
}

impl Session {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session from a map of variables.
    pub fn from_map(variables: HashMap<String, String>) -> Self {
        Self { variables }
    }

    /// A session acting as `user`.
    pub fn for_user(user: &UserRef) -> Self {
        let mut session = Self::new();
        session.set(USER_ID, user.id.clone());
        if let Some(name) = &user.name {
            session.set(USER_NAME, name.clone());
        }
        session
    }

    /// Get the user ID (`x-library-user-id`).
    pub fn user_id(&self) -> Option<&str> {
        self.get(USER_ID)
    }

    /// Get the user's display name (`x-library-user-name`).
    pub fn user_name(&self) -> Option<&str> {
        self.get(USER_NAME)
    }

    /// Get the user role (`x-library-role`).
    pub fn role(&self) -> Option<&str> {
        self.get(ROLE)
    }

    /// The acting user, if the session names one.
    pub fn user(&self) -> Option<UserRef> {
        let id = self.user_id()?;
        Some(match self.user_name() {
            Some(name) => UserRef::named(id, name),
            None => UserRef::new(id),
        })
    }

    /// Get a session variable by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(|v| v.as_str())
    }

    /// Set a session variable.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    /// Check if a session variable exists.
    pub fn has(&self, key: &str) -> bool {
        self.variables.contains_key(key)
    }

    /// Get all session variables.
    pub fn variables(&self) -> &HashMap<String, String> {
        &self.variables
    }
}
