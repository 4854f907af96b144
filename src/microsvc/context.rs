//! Context passed to command handlers.
//!
//! Carries the parsed input, session variables, and a reference to the
//! library. Handlers access everything they need through the context.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::HandlerError;
use super::session::Session;
use crate::actor::UserRef;
use crate::library::Library;

/// The context passed to every command handler.
///
/// Generic over `S` (the model store) so handlers work against whatever
/// store the library is configured with.
///
/// ## Example
///
/// ```ignore
/// pub fn handle<S: ModelStore>(ctx: &Context<S>) -> Result<Value, HandlerError> {
///     let actor = ctx.actor()?;
///     let input = ctx.input::<NewCheckout>()?;
///     let checkout = ctx.library().checkouts_as(&actor).create(input)?;
///     Ok(json!({ "id": checkout.id }))
/// }
/// ```
pub struct Context<'a, S> {
    command_name: String,
    input: Value,
    session: Session,
    library: &'a Library<S>,
}

impl<'a, S> Context<'a, S> {
    pub(crate) fn new(
        command_name: String,
        input: Value,
        session: Session,
        library: &'a Library<S>,
    ) -> Self {
        Self {
            command_name,
            input,
            session,
            library,
        }
    }

    /// Deserialize the input payload into a typed struct.
    pub fn input<T: DeserializeOwned>(&self) -> Result<T, HandlerError> {
        serde_json::from_value(self.input.clone())
            .map_err(|e| HandlerError::DecodeFailed(e.to_string()))
    }

    /// Get the raw JSON input.
    pub fn raw_input(&self) -> &Value {
        &self.input
    }

    pub fn command_name(&self) -> &str {
        &self.command_name
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Get the user ID from the session. Returns `Unauthorized` if not present.
    pub fn user_id(&self) -> Result<&str, HandlerError> {
        self.session
            .user_id()
            .ok_or_else(|| HandlerError::Unauthorized("missing user ID in session".into()))
    }

    /// The acting user, for operations that record who performed them.
    pub fn actor(&self) -> Result<UserRef, HandlerError> {
        self.session
            .user()
            .ok_or_else(|| HandlerError::Unauthorized("missing user ID in session".into()))
    }

    pub fn role(&self) -> Option<&str> {
        self.session.role()
    }

    pub fn library(&self) -> &Library<S> {
        self.library
    }

    /// Check if the raw input contains a field.
    pub fn has_field(&self, field: &str) -> bool {
        self.input.get(field).is_some()
    }

    /// Check if the raw input contains all specified fields.
    pub fn has_fields(&self, fields: &[&str]) -> bool {
        fields.iter().all(|f| self.has_field(f))
    }

    /// Check that `field` is present and a non-empty string.
    pub fn has_text(&self, field: &str) -> bool {
        self.input
            .get(field)
            .and_then(Value::as_str)
            .is_some_and(|s| !s.trim().is_empty())
    }
}
