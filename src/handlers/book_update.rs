//! Handler: book.update
//!
//! Input: `{ "id": "...", "changes": { ... } }`. A `null` in `changes`
//! clears the field; `publisher_country_id` writes through to the publisher.

use serde::Deserialize;
use serde_json::Value;

use crate::catalog::BookChanges;
use crate::microsvc::{Context, HandlerError};
use crate::model::ModelStore;

pub const COMMAND: &str = "book.update";

#[derive(Deserialize)]
pub struct Input {
    pub id: String,
    #[serde(default)]
    pub changes: BookChanges,
}

pub fn guard<S>(ctx: &Context<S>) -> bool {
    ctx.has_text("id")
}

pub fn handle<S: ModelStore>(ctx: &Context<S>) -> Result<Value, HandlerError> {
    let input = ctx.input::<Input>()?;
    let book = ctx.library().catalog().update(&input.id, input.changes)?;
    Ok(serde_json::to_value(book)?)
}
