//! CheckoutWorkflow - stage-driven checkout lifecycle.
//!
//! A checkout's state is the state tag of its current stage. Moving a
//! checkout to another stage is an ordinary write; the workflow compares the
//! state before and after every tracked write and stamps the checkout date
//! on entering `open` and the close date on entering `done`. The stamp is
//! itself a write made in [`WriteMode::Stamp`], which skips the comparison.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::actor::CurrentActor;
use crate::catalog::Book;
use crate::clock::Clock;
use crate::config::{CreationGuard, LibraryConfig};
use crate::error::{LibraryError, LibraryResult};
use crate::member::Member;
use crate::model::{Filter, ModelStore, ModelsExt, Order, Query, Versioned};

use super::{
    Checkout, CheckoutChanges, CheckoutLine, CheckoutStage, NewCheckout, StageState, WriteOutcome,
};

const FORBIDDEN_INITIAL_STATE: &str = "State not allowed for new checkouts.";

/// Whether a write takes part in state-transition tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Compare states around the write and stamp dates on transitions.
    Tracked,
    /// Plain write, used for the stamps themselves.
    Stamp,
}

/// A kanban column: a stage and the checkouts currently in it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StageColumn {
    pub stage: CheckoutStage,
    pub checkouts: Vec<Checkout>,
}

pub struct CheckoutWorkflow<'a, S> {
    store: &'a S,
    clock: &'a dyn Clock,
    actor: &'a dyn CurrentActor,
    config: &'a LibraryConfig,
}

impl<'a, S: ModelStore> CheckoutWorkflow<'a, S> {
    pub fn new(
        store: &'a S,
        clock: &'a dyn Clock,
        actor: &'a dyn CurrentActor,
        config: &'a LibraryConfig,
    ) -> Self {
        Self {
            store,
            clock,
            actor,
            config,
        }
    }

    // ========================================================================
    // Stages
    // ========================================================================

    pub fn add_stage(&self, stage: CheckoutStage) -> LibraryResult<CheckoutStage> {
        self.store.models::<CheckoutStage>().insert(&stage)?;
        debug!(stage_id = %stage.id, name = %stage.name, state = %stage.state, "stage added");
        Ok(stage)
    }

    /// The stage new checkouts start in: the first `new` stage by
    /// sequence, then id.
    pub fn default_stage(&self) -> LibraryResult<Option<CheckoutStage>> {
        let query = Query::filter(Filter::new().eq("state", StageState::New.as_str()))
            .order_by(Order::asc("sequence"))
            .order_by(Order::asc("id"))
            .limit(1);
        Ok(self
            .store
            .models::<CheckoutStage>()
            .query_records(&query)?
            .into_iter()
            .next())
    }

    /// Every stage in display order, whether or not any checkout uses it.
    pub fn expand_stages(&self) -> LibraryResult<Vec<CheckoutStage>> {
        let query = Query::new()
            .order_by(Order::asc("sequence"))
            .order_by(Order::asc("id"));
        Ok(self.store.models::<CheckoutStage>().query_records(&query)?)
    }

    /// Checkouts grouped under every stage, empty stages included.
    /// Checkouts without a stage are not listed.
    pub fn group_by_stage(&self) -> LibraryResult<Vec<StageColumn>> {
        let checkouts = self.store.models::<Checkout>().find_records(&|_| true)?;
        Ok(self
            .expand_stages()?
            .into_iter()
            .map(|stage| StageColumn {
                checkouts: checkouts
                    .iter()
                    .filter(|c| c.stage_id.as_deref() == Some(stage.id.as_str()))
                    .cloned()
                    .collect(),
                stage,
            })
            .collect())
    }

    // ========================================================================
    // Checkouts
    // ========================================================================

    /// Create a checkout, refusing one that would start in an `open` or
    /// `done` stage. How the refusal happens depends on
    /// [`LibraryConfig::creation_guard`].
    pub fn create(&self, new: NewCheckout) -> LibraryResult<Checkout> {
        self.require::<Member>(&new.member_id)?;

        let stage = match new.stage_id.as_deref() {
            Some(stage_id) => Some(self.stage(stage_id)?),
            None => self.default_stage()?,
        };

        if self.config.creation_guard == CreationGuard::PreValidate {
            if let Some(stage) = &stage {
                if stage.state.forbidden_at_creation() {
                    return Err(LibraryError::user(FORBIDDEN_INITIAL_STATE));
                }
            }
        }

        let checkout = Checkout {
            id: uuid::Uuid::new_v4().to_string(),
            member_id: new.member_id,
            user_id: new
                .user_id
                .or_else(|| Some(self.actor.current_user().id)),
            request_date: new.request_date.unwrap_or_else(|| self.clock.today()),
            stage_id: stage.map(|s| s.id),
            checkout_date: None,
            close_date: None,
        };

        self.store.transaction(|| -> LibraryResult<()> {
            self.store.models::<Checkout>().insert(&checkout)?;
            for book_id in &new.book_ids {
                self.insert_line(&checkout.id, book_id)?;
            }

            if self.config.creation_guard == CreationGuard::RollbackAfterInsert {
                let state = self.stage_state(&self.load(&checkout.id)?.data)?;
                if state.is_some_and(|s| s.forbidden_at_creation()) {
                    warn!(checkout_id = %checkout.id, "checkout created in a forbidden state, rolling back");
                    return Err(LibraryError::user(FORBIDDEN_INITIAL_STATE));
                }
            }
            Ok(())
        })?;

        info!(
            checkout_id = %checkout.id,
            member_id = %checkout.member_id,
            stage_id = ?checkout.stage_id,
            lines = new.book_ids.len(),
            "checkout created"
        );
        Ok(checkout)
    }

    /// Apply `changes` to a checkout, stamping dates on state transitions.
    ///
    /// A member change resets the request date to today and reports a
    /// notice when the date moved; an explicit `request_date` in the same
    /// changes is applied after that reset.
    pub fn write(&self, id: &str, changes: CheckoutChanges) -> LibraryResult<WriteOutcome> {
        if let Some(member_id) = changes.member_id.as_deref() {
            self.require::<Member>(member_id)?;
        }
        if let Some(stage_id) = changes.stage_id.as_deref() {
            self.stage(stage_id)?;
        }

        let today = self.clock.today();
        let mut notices = Vec::new();

        let checkout = self.store.transaction(|| {
            self.write_record(id, WriteMode::Tracked, &mut |checkout: &mut Checkout| {
                if let Some(member_id) = &changes.member_id {
                    if *member_id != checkout.member_id {
                        checkout.member_id = member_id.clone();
                        notices.extend(checkout.on_member_change(today));
                    }
                }
                if let Some(user_id) = &changes.user_id {
                    checkout.user_id = Some(user_id.clone());
                }
                if let Some(request_date) = changes.request_date {
                    checkout.request_date = request_date;
                }
                if let Some(stage_id) = &changes.stage_id {
                    checkout.stage_id = Some(stage_id.clone());
                }
            })
        })?;

        Ok(WriteOutcome { checkout, notices })
    }

    /// Load, change and store one checkout. In [`WriteMode::Tracked`] a
    /// transition into `open` or `done` is followed by a stamp write.
    fn write_record(
        &self,
        id: &str,
        mode: WriteMode,
        apply: &mut dyn FnMut(&mut Checkout),
    ) -> LibraryResult<Checkout> {
        let Versioned {
            data: mut checkout,
            version,
        } = self.load(id)?;

        let old_state = match mode {
            WriteMode::Tracked => self.stage_state(&checkout)?,
            WriteMode::Stamp => None,
        };

        apply(&mut checkout);
        let stored = self.store.models::<Checkout>().update(&checkout, version)?;

        if mode == WriteMode::Stamp {
            return Ok(stored.data);
        }

        let new_state = self.stage_state(&stored.data)?;
        if new_state == old_state {
            return Ok(stored.data);
        }

        info!(
            checkout_id = id,
            from = old_state.map(|s| s.as_str()).unwrap_or("none"),
            to = new_state.map(|s| s.as_str()).unwrap_or("none"),
            "checkout state changed"
        );

        let today = self.clock.today();
        match new_state {
            Some(StageState::Open) => self.stamp(id, today, |c, date| c.checkout_date = Some(date)),
            Some(StageState::Done) => self.stamp(id, today, |c, date| c.close_date = Some(date)),
            _ => Ok(stored.data),
        }
    }

    fn stamp(
        &self,
        id: &str,
        date: NaiveDate,
        set: fn(&mut Checkout, NaiveDate),
    ) -> LibraryResult<Checkout> {
        let checkout = self.write_record(id, WriteMode::Stamp, &mut |c: &mut Checkout| set(c, date))?;
        debug!(checkout_id = id, %date, "checkout date stamped");
        Ok(checkout)
    }

    pub fn get(&self, id: &str) -> LibraryResult<Checkout> {
        Ok(self.load(id)?.data)
    }

    /// The checkout's state: its stage's tag, or `None` without a stage.
    pub fn state_of(&self, id: &str) -> LibraryResult<Option<StageState>> {
        let checkout = self.load(id)?.data;
        self.stage_state(&checkout)
    }

    /// Delete a checkout together with its lines.
    pub fn delete(&self, id: &str) -> LibraryResult<bool> {
        self.store.transaction(|| -> LibraryResult<bool> {
            if !self.store.models::<Checkout>().exists(id)? {
                return Ok(false);
            }
            let lines = self.lines(id)?;
            for line in &lines {
                self.store.models::<CheckoutLine>().delete(&line.id)?;
            }
            self.store.models::<Checkout>().delete(id)?;

            info!(checkout_id = id, lines = lines.len(), "checkout deleted");
            Ok(true)
        })
    }

    // ========================================================================
    // Lines
    // ========================================================================

    pub fn add_line(&self, checkout_id: &str, book_id: &str) -> LibraryResult<CheckoutLine> {
        self.require::<Checkout>(checkout_id)?;
        self.insert_line(checkout_id, book_id)
    }

    pub fn remove_line(&self, line_id: &str) -> LibraryResult<bool> {
        Ok(self.store.models::<CheckoutLine>().delete(line_id)?)
    }

    pub fn lines(&self, checkout_id: &str) -> LibraryResult<Vec<CheckoutLine>> {
        Ok(self
            .store
            .models::<CheckoutLine>()
            .find_records(&|line| line.checkout_id == checkout_id)?)
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn insert_line(&self, checkout_id: &str, book_id: &str) -> LibraryResult<CheckoutLine> {
        self.require::<Book>(book_id)?;
        let line = CheckoutLine::new(checkout_id, book_id);
        self.store.models::<CheckoutLine>().insert(&line)?;
        Ok(line)
    }

    fn load(&self, id: &str) -> LibraryResult<Versioned<Checkout>> {
        Ok(self.store.models::<Checkout>().fetch(id)?)
    }

    fn stage(&self, id: &str) -> LibraryResult<CheckoutStage> {
        Ok(self.store.models::<CheckoutStage>().fetch(id)?.data)
    }

    fn stage_state(&self, checkout: &Checkout) -> LibraryResult<Option<StageState>> {
        match checkout.stage_id.as_deref() {
            Some(stage_id) => Ok(Some(self.stage(stage_id)?.state)),
            None => Ok(None),
        }
    }

    fn require<M: crate::Model>(&self, id: &str) -> LibraryResult<()> {
        if self.store.models::<M>().exists(id)? {
            Ok(())
        } else {
            Err(LibraryError::not_found::<M>(id))
        }
    }
}
