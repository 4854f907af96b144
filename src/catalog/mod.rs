//! Book catalog: the `Book` record, its validation rules, the derived
//! publisher country, and the [`BookCatalog`] operations.

mod book;
mod book_catalog;
mod derived;

pub use book::{Book, BookChanges, BookType, NewBook};
pub use book_catalog::BookCatalog;
pub use derived::{DerivedField, PublisherCountry};
