//! Book catalog integration tests.

mod support;
mod books;
mod search;
