//! Derived fields: values computed through a relation, writable back through
//! it, and searchable by rewriting filters onto the source path.
//!
//! All three directions go through the same relation, so writing a derived
//! field can never leave it out of sync with its source.

use crate::error::{LibraryError, LibraryResult};
use crate::model::{Condition, Filter, Model, ModelStore, ModelsExt, Query};
use crate::partner::{Contact, Country};

use super::Book;

/// A field of `Record` that lives on a related record.
pub trait DerivedField {
    type Record: Model;
    type Value;

    /// Name the field is exposed under.
    const NAME: &'static str;
    /// Dotted path of the stored value it mirrors.
    const SOURCE_PATH: &'static str;

    /// Read through the relation.
    fn get<S: ModelStore>(store: &S, record: &Self::Record) -> LibraryResult<Self::Value>;

    /// Write through the relation.
    fn set<S: ModelStore>(
        store: &S,
        record: &Self::Record,
        value: Self::Value,
    ) -> LibraryResult<()>;

    /// Map a path rooted at [`Self::NAME`] onto [`Self::SOURCE_PATH`].
    fn rewrite_path(path: &str) -> Option<String> {
        let rest = path.strip_prefix(Self::NAME)?;
        if rest.is_empty() || rest.starts_with('.') {
            Some(format!("{}{}", Self::SOURCE_PATH, rest))
        } else {
            None
        }
    }

    fn rewrite(condition: Condition) -> Condition {
        match Self::rewrite_path(&condition.field) {
            Some(field) => Condition { field, ..condition },
            None => condition,
        }
    }

    fn rewrite_filter(filter: Filter) -> Filter {
        filter.map(Self::rewrite)
    }

    /// Rewrite filter and ordering of a whole query.
    fn rewrite_query(mut query: Query) -> Query {
        query.filter = Self::rewrite_filter(query.filter);
        for order in &mut query.order {
            if let Some(field) = Self::rewrite_path(&order.field) {
                order.field = field;
            }
        }
        query
    }
}

/// `Book.publisher_country_id`, mirroring `publisher_id.country_id`.
pub struct PublisherCountry;

impl DerivedField for PublisherCountry {
    type Record = Book;
    type Value = Option<String>;

    const NAME: &'static str = "publisher_country_id";
    const SOURCE_PATH: &'static str = "publisher_id.country_id";

    fn get<S: ModelStore>(store: &S, book: &Book) -> LibraryResult<Option<String>> {
        let Some(publisher_id) = book.publisher_id.as_deref() else {
            return Ok(None);
        };
        let publisher = store.models::<Contact>().fetch(publisher_id)?;
        Ok(publisher.data.country_id)
    }

    fn set<S: ModelStore>(store: &S, book: &Book, country_id: Option<String>) -> LibraryResult<()> {
        let Some(publisher_id) = book.publisher_id.as_deref() else {
            return Err(LibraryError::validation(format!(
                "Set a publisher on {} before setting the publisher country.",
                book.title
            )));
        };
        if let Some(country_id) = country_id.as_deref() {
            if !store.models::<Country>().exists(country_id)? {
                return Err(LibraryError::not_found::<Country>(country_id));
            }
        }

        let mut publisher = store.models::<Contact>().fetch(publisher_id)?;
        if publisher.data.country_id == country_id {
            return Ok(());
        }
        publisher.data.country_id = country_id;
        store
            .models::<Contact>()
            .update(&publisher.data, publisher.version)?;
        Ok(())
    }
}
