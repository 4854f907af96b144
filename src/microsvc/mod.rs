//! microsvc - Convention-based command handler framework over a [`Library`].
//!
//! Register command handlers on a `Service`. Each handler receives a
//! `Context<S>` with access to the input payload, session variables, and
//! the library.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use library_workflow::microsvc::{self, Session};
//! use serde_json::json;
//!
//! let service = Arc::new(library_workflow::handlers::library_service(library));
//!
//! // Direct dispatch
//! let result = service.dispatch(
//!     "book.create",
//!     json!({ "title": "Odoo Development Essentials" }),
//!     Session::new(),
//! );
//!
//! // HTTP transport (requires "http" feature)
//! // microsvc::serve(service, "0.0.0.0:3000").await?;
//! ```
//!
//! ## Handler Convention
//!
//! Each handler file follows this convention:
//!
//! ```ignore
//! // src/handlers/book_create.rs
//!
//! pub const COMMAND: &str = "book.create";
//!
//! pub fn guard<S>(ctx: &microsvc::Context<S>) -> bool {
//!     ctx.has_text("title")
//! }
//!
//! pub fn handle<S: ModelStore>(
//!     ctx: &microsvc::Context<S>,
//! ) -> Result<Value, microsvc::HandlerError> {
//!     let book = ctx.library().catalog().create(ctx.input::<NewBook>()?)?;
//!     Ok(serde_json::to_value(book)?)
//! }
//! ```
//!
//! [`Library`]: crate::Library

mod context;
mod error;
mod service;
mod session;

pub use context::Context;
pub use error::HandlerError;
pub use service::{CommandRequest, CommandResponse, Service};
pub use session::{Session, ROLE, USER_ID, USER_NAME};

// HTTP transport (requires "http" feature)
#[cfg(feature = "http")]
mod http;
#[cfg(feature = "http")]
pub use http::{router, serve};

/// Register handler modules with a service using the convention pattern.
///
/// Each handler module must export:
/// - `COMMAND: &str`, the command name
/// - `guard(ctx) -> bool`, input validation
/// - `handle(ctx) -> Result<Value, HandlerError>`, the handler
///
/// # Example
/// ```ignore
/// let service = library_workflow::register_handlers!(
///     microsvc::Service::new(library),
///     handlers::book_create,
///     handlers::book_search,
/// );
/// ```
#[macro_export]
macro_rules! register_handlers {
    ($service:expr, $( $($seg:ident)::+ ),+ $(,)?) => {
        $service
        $(
            .command_guarded(
                $($seg)::+::COMMAND,
                $($seg)::+::guard,
                $($seg)::+::handle,
            )
        )+
    };
}
