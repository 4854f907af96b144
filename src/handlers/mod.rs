//! Command handlers for the library service, one file per command.
//!
//! Every handler follows the microsvc convention (`COMMAND`, `guard`,
//! `handle`) and is registered by [`library_service`].

use crate::library::Library;
use crate::microsvc::Service;
use crate::model::ModelStore;

pub mod book_check_isbn;
pub mod book_create;
pub mod book_search;
pub mod book_update;
pub mod checkout_add_line;
pub mod checkout_create;
pub mod checkout_mass_message;
pub mod checkout_stages;
pub mod checkout_write;
pub mod member_create;

/// A service answering every library command.
pub fn library_service<S: ModelStore + 'static>(library: Library<S>) -> Service<S> {
    crate::register_handlers!(
        Service::new(library),
        book_create,
        book_update,
        book_check_isbn,
        book_search,
        member_create,
        checkout_create,
        checkout_write,
        checkout_add_line,
        checkout_stages,
        checkout_mass_message,
    )
}
