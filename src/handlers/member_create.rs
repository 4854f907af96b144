//! Handler: member.create

use serde_json::Value;

use crate::member::NewMember;
use crate::microsvc::{Context, HandlerError};
use crate::model::ModelStore;

pub const COMMAND: &str = "member.create";

pub fn guard<S>(ctx: &Context<S>) -> bool {
    ctx.has_text("partner_id") || ctx.has_text("name")
}

pub fn handle<S: ModelStore>(ctx: &Context<S>) -> Result<Value, HandlerError> {
    let input = ctx.input::<NewMember>()?;
    let profile = ctx.library().members().create(input)?;
    Ok(serde_json::to_value(profile)?)
}
