//! Test fixture: an in-memory library on a fixed date.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use library_workflow::{
    BookCatalog, Contact, Country, FixedClock, InMemoryModelStore, Library, ModelsExt, UserRef,
};

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
}

pub struct Fixture {
    pub clock: Arc<FixedClock>,
    pub library: Library<InMemoryModelStore>,
}

impl Fixture {
    pub fn new() -> Self {
        let clock = Arc::new(FixedClock::on(today()));
        let library = Library::in_memory(clock.clone(), Arc::new(UserRef::new("librarian")));
        Self { clock, library }
    }

    pub fn catalog(&self) -> BookCatalog<'_, InMemoryModelStore> {
        self.library.catalog()
    }

    /// Countries `be` and `pt`, and a publisher based in Belgium.
    pub fn with_publisher(&self) -> Contact {
        let store = self.library.store();
        store.models::<Country>().insert(&Country::new("BE", "Belgium")).unwrap();
        store.models::<Country>().insert(&Country::new("PT", "Portugal")).unwrap();

        let publisher = Contact::new("Packt Publishing").in_country("be");
        store.models::<Contact>().insert(&publisher).unwrap();
        publisher
    }

    pub fn publisher(&self, id: &str) -> Contact {
        self.library.store().models::<Contact>().fetch(id).unwrap().data
    }
}
