//! Handler: checkout.write
//!
//! Returns the stored checkout and any notices, e.g. the request date
//! reset after a member change.

use serde::Deserialize;
use serde_json::Value;

use crate::checkout::CheckoutChanges;
use crate::microsvc::{Context, HandlerError};
use crate::model::ModelStore;

pub const COMMAND: &str = "checkout.write";

#[derive(Deserialize)]
pub struct Input {
    pub id: String,
    #[serde(default)]
    pub changes: CheckoutChanges,
}

pub fn guard<S>(ctx: &Context<S>) -> bool {
    ctx.has_text("id")
}

pub fn handle<S: ModelStore>(ctx: &Context<S>) -> Result<Value, HandlerError> {
    let input = ctx.input::<Input>()?;
    let outcome = ctx.library().checkouts().write(&input.id, input.changes)?;
    Ok(serde_json::to_value(outcome)?)
}
