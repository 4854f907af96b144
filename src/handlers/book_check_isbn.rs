//! Handler: book.check_isbn

use serde::Deserialize;
use serde_json::{json, Value};

use crate::microsvc::{Context, HandlerError};
use crate::model::ModelStore;

pub const COMMAND: &str = "book.check_isbn";

#[derive(Deserialize)]
pub struct Input {
    pub id: String,
}

pub fn guard<S>(ctx: &Context<S>) -> bool {
    ctx.has_text("id")
}

pub fn handle<S: ModelStore>(ctx: &Context<S>) -> Result<Value, HandlerError> {
    let input = ctx.input::<Input>()?;
    ctx.library().catalog().check_isbn(&input.id)?;
    Ok(json!({ "id": input.id, "valid": true }))
}
