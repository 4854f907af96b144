extern crate self as library_workflow;

mod actor;
mod clock;
mod config;
mod error;
mod library;
mod member;
mod partner;

pub mod catalog;
pub mod checkout;
pub mod handlers;
pub mod isbn;
pub mod microsvc;
pub mod model;
pub mod notify;

pub use actor::{CurrentActor, UserRef};
pub use catalog::{Book, BookCatalog, BookChanges, BookType, DerivedField, NewBook, PublisherCountry};
pub use checkout::{
    Checkout, CheckoutChanges, CheckoutLine, CheckoutStage, CheckoutWorkflow, NewCheckout, Notice,
    StageColumn, StageState, WriteMode, WriteOutcome,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{CreationGuard, LibraryConfig};
pub use error::{LibraryError, LibraryResult};
pub use library::Library;
pub use member::{Member, MemberChanges, MemberProfile, MemberRegistry, NewMember};
pub use model::{
    Condition, Constraint, Filter, InMemoryModelStore, Model, ModelRepository, ModelStore,
    ModelsExt, Op, Order, Query, Relation, StoreError, Versioned,
};
pub use notify::{
    BufferSink, ChatterSink, LogMessage, LogSink, MassMessage, MessageTarget, MessagingError,
    MessagingSink, PostedMessage,
};
pub use partner::{Contact, Country, Currency};

// Derive macro shares the trait's name, as serde does.
pub use library_workflow_macros::Model;

// Re-export the EventEmitter from the event_emitter_rs crate
#[cfg(feature = "emitter")]
pub use event_emitter_rs::EventEmitter;
#[cfg(feature = "emitter")]
pub use notify::EmitterSink;
