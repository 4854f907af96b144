//! Handler: checkout.add_line

use serde::Deserialize;
use serde_json::Value;

use crate::microsvc::{Context, HandlerError};
use crate::model::ModelStore;

pub const COMMAND: &str = "checkout.add_line";

#[derive(Deserialize)]
pub struct Input {
    pub checkout_id: String,
    pub book_id: String,
}

pub fn guard<S>(ctx: &Context<S>) -> bool {
    ctx.has_text("checkout_id") && ctx.has_text("book_id")
}

pub fn handle<S: ModelStore>(ctx: &Context<S>) -> Result<Value, HandlerError> {
    let input = ctx.input::<Input>()?;
    let line = ctx
        .library()
        .checkouts()
        .add_line(&input.checkout_id, &input.book_id)?;
    Ok(serde_json::to_value(line)?)
}
