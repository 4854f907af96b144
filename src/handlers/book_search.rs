//! Handler: book.search
//!
//! Input is a query: `{ "filter": [...], "order": [...], "limit": n }`,
//! every part optional.

use serde_json::{json, Value};

use crate::microsvc::{Context, HandlerError};
use crate::model::{ModelStore, Query};

pub const COMMAND: &str = "book.search";

pub fn guard<S>(ctx: &Context<S>) -> bool {
    ctx.raw_input().is_object()
}

pub fn handle<S: ModelStore>(ctx: &Context<S>) -> Result<Value, HandlerError> {
    let query = ctx.input::<Query>()?;
    let books = ctx.library().catalog().search(query)?;
    Ok(json!({ "count": books.len(), "books": books }))
}
