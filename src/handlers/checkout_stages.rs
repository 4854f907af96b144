//! Handler: checkout.stages
//!
//! Kanban view: every stage in order with the checkouts in it.

use serde_json::{json, Value};

use crate::microsvc::{Context, HandlerError};
use crate::model::ModelStore;

pub const COMMAND: &str = "checkout.stages";

pub fn guard<S>(_ctx: &Context<S>) -> bool {
    true
}

pub fn handle<S: ModelStore>(ctx: &Context<S>) -> Result<Value, HandlerError> {
    let columns = ctx.library().checkouts().group_by_stage()?;
    Ok(json!({ "columns": columns }))
}
