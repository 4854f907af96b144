//! Handler: book.create

use serde_json::Value;

use crate::catalog::NewBook;
use crate::microsvc::{Context, HandlerError};
use crate::model::ModelStore;

pub const COMMAND: &str = "book.create";

pub fn guard<S>(ctx: &Context<S>) -> bool {
    ctx.has_text("title")
}

pub fn handle<S: ModelStore>(ctx: &Context<S>) -> Result<Value, HandlerError> {
    let input = ctx.input::<NewBook>()?;
    let book = ctx.library().catalog().create(input)?;
    Ok(serde_json::to_value(book)?)
}
