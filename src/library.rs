//! Library - the entry point tying a store to its clock, actor and config.

use std::sync::Arc;

use crate::actor::CurrentActor;
use crate::catalog::BookCatalog;
use crate::checkout::CheckoutWorkflow;
use crate::clock::Clock;
use crate::config::LibraryConfig;
use crate::error::LibraryResult;
use crate::member::MemberRegistry;
use crate::model::{InMemoryModelStore, ModelStore};
use crate::notify::{ChatterSink, MassMessage, MessagingSink};

/// A library over a model store.
///
/// The clock and actor are injected: nothing in the crate reads the system
/// time or the current user from ambient state.
pub struct Library<S> {
    store: S,
    clock: Arc<dyn Clock>,
    actor: Arc<dyn CurrentActor>,
    config: LibraryConfig,
}

impl Library<InMemoryModelStore> {
    /// An in-memory library whose store checks dates against `clock`.
    pub fn in_memory(clock: Arc<dyn Clock>, actor: Arc<dyn CurrentActor>) -> Self {
        let store = InMemoryModelStore::with_clock(Arc::clone(&clock));
        Self::new(store, clock, actor)
    }
}

impl<S: ModelStore> Library<S> {
    pub fn new(store: S, clock: Arc<dyn Clock>, actor: Arc<dyn CurrentActor>) -> Self {
        Self {
            store,
            clock,
            actor,
            config: LibraryConfig::default(),
        }
    }

    pub fn with_config(mut self, config: LibraryConfig) -> Self {
        self.config = config;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn config(&self) -> &LibraryConfig {
        &self.config
    }

    pub fn catalog(&self) -> BookCatalog<'_, S> {
        BookCatalog::new(&self.store, self.clock.as_ref(), &self.config)
    }

    pub fn members(&self) -> MemberRegistry<'_, S> {
        MemberRegistry::new(&self.store)
    }

    /// Checkout operations on behalf of the library's own actor.
    pub fn checkouts(&self) -> CheckoutWorkflow<'_, S> {
        self.checkouts_as(self.actor.as_ref())
    }

    /// Checkout operations on behalf of `actor`, e.g. the user of a request.
    pub fn checkouts_as<'a>(&'a self, actor: &'a dyn CurrentActor) -> CheckoutWorkflow<'a, S> {
        CheckoutWorkflow::new(&self.store, self.clock.as_ref(), actor, &self.config)
    }

    /// The store-backed communication log, posting as the library's actor.
    pub fn chatter(&self) -> ChatterSink<'_, S> {
        ChatterSink::new(&self.store, self.clock.as_ref()).authored_by(self.actor.current_user())
    }

    /// Send `message` through `sink` on the configured channel.
    pub fn mass_message(&self, message: &MassMessage, sink: &dyn MessagingSink) -> LibraryResult<usize> {
        message.send(&self.store, sink, &self.config.message_channel)
    }
}
