//! Handler: checkout.mass_message
//!
//! Posts to each checkout's stored communication log, authored by the
//! session user when there is one.

use serde_json::{json, Value};

use crate::microsvc::{Context, HandlerError};
use crate::model::ModelStore;
use crate::notify::{ChatterSink, MassMessage};

pub const COMMAND: &str = "checkout.mass_message";

pub fn guard<S>(ctx: &Context<S>) -> bool {
    ctx.has_field("checkout_ids")
}

pub fn handle<S: ModelStore>(ctx: &Context<S>) -> Result<Value, HandlerError> {
    let message = ctx.input::<MassMessage>()?;
    let library = ctx.library();

    let posted = match ctx.session().user() {
        Some(actor) => {
            let sink = ChatterSink::new(library.store(), library.clock()).authored_by(actor);
            library.mass_message(&message, &sink)?
        }
        None => library.mass_message(&message, &library.chatter())?,
    };
    Ok(json!({ "posted": posted }))
}
