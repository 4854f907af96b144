//! Checkouts: stages, checkout records and their lines, and the
//! [`CheckoutWorkflow`] that moves checkouts between stages.

mod checkout;
mod stage;
mod workflow;

pub use checkout::{Checkout, CheckoutChanges, CheckoutLine, NewCheckout, Notice, WriteOutcome};
pub use stage::{CheckoutStage, StageState};
pub use workflow::{CheckoutWorkflow, StageColumn, WriteMode};
