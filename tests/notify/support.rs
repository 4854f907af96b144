//! Test fixture: a library with two checkouts to message.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use library_workflow::{
    CheckoutStage, FixedClock, InMemoryModelStore, Library, NewCheckout, NewMember, StageState,
    UserRef,
};

pub struct Fixture {
    pub library: Library<InMemoryModelStore>,
    pub checkout_ids: Vec<String>,
}

impl Fixture {
    pub fn new() -> Self {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        let clock = Arc::new(FixedClock::on(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()));
        let library = Library::in_memory(clock, Arc::new(UserRef::named("librarian", "Lena")));

        library
            .checkouts()
            .add_stage(CheckoutStage::new("Requested", 10, StageState::New))
            .unwrap();
        let member_id = library
            .members()
            .create(NewMember::named("Ana Borrower"))
            .unwrap()
            .member
            .id;
        let checkout_ids = (0..2)
            .map(|_| {
                library
                    .checkouts()
                    .create(NewCheckout::for_member(&member_id))
                    .unwrap()
                    .id
            })
            .collect();

        Self {
            library,
            checkout_ids,
        }
    }
}
