//! Handler: checkout.create
//!
//! The librarian defaults to the session user, or to the library's own
//! actor when the session names none.

use serde_json::Value;

use crate::checkout::NewCheckout;
use crate::microsvc::{Context, HandlerError};
use crate::model::ModelStore;

pub const COMMAND: &str = "checkout.create";

pub fn guard<S>(ctx: &Context<S>) -> bool {
    ctx.has_text("member_id")
}

pub fn handle<S: ModelStore>(ctx: &Context<S>) -> Result<Value, HandlerError> {
    let input = ctx.input::<NewCheckout>()?;
    let checkout = match ctx.session().user() {
        Some(actor) => {
            let workflow = ctx.library().checkouts_as(&actor);
            workflow.create(input)?
        }
        None => ctx.library().checkouts().create(input)?,
    };
    Ok(serde_json::to_value(checkout)?)
}
