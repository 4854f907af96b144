//! Test fixture: a library with the usual checkout stages, one member and
//! a couple of books.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use library_workflow::{
    CheckoutStage, CheckoutWorkflow, CreationGuard, FixedClock, InMemoryModelStore, Library,
    LibraryConfig, NewBook, NewMember, StageState, UserRef,
};

pub const REQUESTED: &str = "requested";
pub const LENT: &str = "lent";
pub const OVERDUE: &str = "overdue";
pub const RETURNED: &str = "returned";
pub const CANCELLED: &str = "cancelled";

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
}

pub struct Fixture {
    pub clock: Arc<FixedClock>,
    pub library: Library<InMemoryModelStore>,
    pub member_id: String,
    pub book_ids: Vec<String>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_guard(CreationGuard::PreValidate)
    }

    pub fn with_guard(creation_guard: CreationGuard) -> Self {
        let clock = Arc::new(FixedClock::on(today()));
        let library = Library::in_memory(clock.clone(), Arc::new(UserRef::new("librarian")))
            .with_config(LibraryConfig {
                creation_guard,
                ..LibraryConfig::default()
            });

        let workflow = library.checkouts();
        for stage in [
            CheckoutStage::new("Requested", 10, StageState::New).with_id(REQUESTED),
            CheckoutStage::new("Lent", 20, StageState::Open).with_id(LENT),
            CheckoutStage::new("Overdue", 30, StageState::Open).with_id(OVERDUE),
            CheckoutStage::new("Returned", 40, StageState::Done).with_id(RETURNED).folded(),
            CheckoutStage::new("Cancelled", 50, StageState::Cancel).with_id(CANCELLED).folded(),
        ] {
            workflow.add_stage(stage).unwrap();
        }

        let member_id = library
            .members()
            .create(NewMember::named("Ana Borrower"))
            .unwrap()
            .member
            .id;
        let book_ids = ["Rust in Action", "Programming Rust"]
            .into_iter()
            .map(|title| library.catalog().create(NewBook::titled(title)).unwrap().id)
            .collect();

        Self {
            clock,
            library,
            member_id,
            book_ids,
        }
    }

    pub fn workflow(&self) -> CheckoutWorkflow<'_, InMemoryModelStore> {
        self.library.checkouts()
    }

    pub fn other_member(&self) -> String {
        self.library
            .members()
            .create(NewMember::named("Bruno Reader"))
            .unwrap()
            .member
            .id
    }
}
