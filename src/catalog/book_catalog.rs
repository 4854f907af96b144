//! BookCatalog - create, update and search books.

use tracing::info;

use crate::checkout::CheckoutLine;
use crate::clock::Clock;
use crate::config::LibraryConfig;
use crate::error::{LibraryError, LibraryResult};
use crate::model::{ModelStore, ModelsExt, Query, Versioned};

use super::derived::{DerivedField, PublisherCountry};
use super::{Book, BookChanges, NewBook};

/// Book operations over a model store.
pub struct BookCatalog<'a, S> {
    store: &'a S,
    clock: &'a dyn Clock,
    config: &'a LibraryConfig,
}

impl<'a, S: ModelStore> BookCatalog<'a, S> {
    pub fn new(store: &'a S, clock: &'a dyn Clock, config: &'a LibraryConfig) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    /// Create a book. The store rejects duplicate (title, publish date)
    /// pairs and publish dates in the future.
    pub fn create(&self, new: NewBook) -> LibraryResult<Book> {
        let book = new.into_book(self.clock.now(), self.config.default_copies);
        book.validate()?;
        self.store.models::<Book>().insert(&book)?;

        info!(book_id = %book.id, title = %book.title, "book created");
        Ok(book)
    }

    /// Apply `changes` to a book. A change of `publisher_country_id` is
    /// written to the (possibly just changed) publisher in the same transaction.
    pub fn update(&self, id: &str, changes: BookChanges) -> LibraryResult<Book> {
        self.store.transaction(|| -> LibraryResult<Book> {
            let Versioned {
                data: mut book,
                version,
            } = self.load(id)?;

            let publisher_country = changes.apply(&mut book);
            book.validate()?;
            self.store.models::<Book>().update(&book, version)?;

            if let Some(country_id) = publisher_country {
                PublisherCountry::set(self.store, &book, country_id)?;
            }
            Ok(book)
        })
    }

    pub fn get(&self, id: &str) -> LibraryResult<Book> {
        Ok(self.load(id)?.data)
    }

    /// Search books. Filters and ordering on `publisher_country_id` are
    /// rewritten onto the publisher; archived books are left out unless the
    /// filter mentions `active`.
    pub fn search(&self, query: Query) -> LibraryResult<Vec<Book>> {
        let include_archived = query.filter.mentions("active");
        let mut query = PublisherCountry::rewrite_query(query);
        if !include_archived {
            query.filter = query.filter.eq("active", true);
        }

        Ok(self.store.models::<Book>().query_records(&query)?)
    }

    /// Delete a book. Refused while any checkout line still lends it.
    pub fn delete(&self, id: &str) -> LibraryResult<bool> {
        self.store.transaction(|| -> LibraryResult<bool> {
            if self
                .store
                .models::<CheckoutLine>()
                .any(&|line| line.book_id == id)?
            {
                return Err(LibraryError::validation(
                    "This book is on a checkout and cannot be deleted.",
                ));
            }
            Ok(self.store.models::<Book>().delete(id)?)
        })
    }

    /// Hide a book from searches without deleting it.
    pub fn archive(&self, id: &str) -> LibraryResult<Book> {
        self.update(
            id,
            BookChanges {
                active: Some(false),
                ..BookChanges::default()
            },
        )
    }

    pub fn unarchive(&self, id: &str) -> LibraryResult<Book> {
        self.update(
            id,
            BookChanges {
                active: Some(true),
                ..BookChanges::default()
            },
        )
    }

    /// Explicit ISBN check on a stored book: fails when the ISBN is missing
    /// or does not pass the checksum.
    pub fn check_isbn(&self, id: &str) -> LibraryResult<()> {
        self.get(id)?.check_isbn_or_fail()
    }

    pub fn publisher_country(&self, id: &str) -> LibraryResult<Option<String>> {
        let book = self.get(id)?;
        PublisherCountry::get(self.store, &book)
    }

    pub fn set_publisher_country(&self, id: &str, country_id: Option<String>) -> LibraryResult<()> {
        self.store.transaction(|| -> LibraryResult<()> {
            let book = self.get(id)?;
            PublisherCountry::set(self.store, &book, country_id)
        })
    }

    fn load(&self, id: &str) -> LibraryResult<Versioned<Book>> {
        Ok(self.store.models::<Book>().fetch(id)?)
    }
}
