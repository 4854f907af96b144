//! Models - Storage-backed records for every library entity.
//!
//! Models provide a simple CRUD abstraction for storing typed data. Each
//! model declares its collection, its many-to-one relations (followed by
//! dotted filter paths such as `publisher_id.country_id`), and the unique
//! and check constraints the store enforces on every insert and update.
//!
//! ## Example
//!
//! ```ignore
//! use library_workflow::{Model, InMemoryModelStore, ModelsExt};
//!
//! #[derive(Serialize, Deserialize, Clone, Model)]
//! #[model(collection = "countries")]
//! struct Country {
//!     pub id: String,
//!     pub code: String,
//! }
//!
//! let store = InMemoryModelStore::new();
//! store.models::<Country>().insert(&country)?;
//! let loaded = store.models::<Country>().get("be")?;
//! ```

mod in_memory;
mod model_repository;
mod query;
mod store;

use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Trait for types that can be stored as models.
pub trait Model: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// The collection name for this model type (e.g., "books", "checkouts").
    /// Maps to a table in SQL, a collection in MongoDB, a key prefix in KV stores, etc.
    const COLLECTION: &'static str;

    /// Returns the unique identifier for this model instance.
    fn id(&self) -> &str;

    /// Many-to-one fields pointing at other collections.
    fn relations() -> &'static [Relation] {
        &[]
    }

    /// Constraints the store checks on every insert and update.
    fn constraints() -> Vec<Constraint<Self>> {
        Vec::new()
    }
}

/// A many-to-one field: `field` holds the id of a record in `collection`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relation {
    pub field: &'static str,
    pub collection: &'static str,
}

/// A store-enforced rule, rejected with [`StoreError::Constraint`].
pub enum Constraint<M> {
    /// No two records may share the same key. A `None` key never collides,
    /// matching SQL `UNIQUE` semantics for NULL columns.
    Unique {
        name: &'static str,
        message: &'static str,
        key: fn(&M) -> Option<String>,
    },
    /// The predicate must hold; it receives the store's current date.
    Check {
        name: &'static str,
        message: &'static str,
        check: fn(&M, NaiveDate) -> bool,
    },
}

impl<M> Constraint<M> {
    pub fn name(&self) -> &'static str {
        match self {
            Constraint::Unique { name, .. } | Constraint::Check { name, .. } => name,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Constraint::Unique { message, .. } | Constraint::Check { message, .. } => message,
        }
    }

    pub(crate) fn violation(&self) -> StoreError {
        StoreError::Constraint {
            name: self.name().to_string(),
            message: self.message().to_string(),
        }
    }
}

/// A versioned wrapper around model data for optimistic concurrency control.
#[derive(Debug, Clone)]
pub struct Versioned<T> {
    pub data: T,
    pub version: u64,
}

/// Error type for model store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A declared unique or check constraint rejected the write.
    #[error("{message}")]
    Constraint { name: String, message: String },
    /// Optimistic concurrency conflict.
    #[error("concurrency conflict on {collection}:{id} (expected version {expected}, actual {actual})")]
    ConcurrencyConflict {
        collection: String,
        id: String,
        expected: u64,
        actual: u64,
    },
    /// Serialization/deserialization error.
    #[error("model serialization error: {0}")]
    Serde(String),
    /// Storage-level error.
    #[error("model storage error: {0}")]
    Storage(String),
    /// Model not found.
    #[error("model not found: {collection}:{id}")]
    NotFound { collection: String, id: String },
    /// The filter or ordering could not be evaluated.
    #[error("invalid query: {0}")]
    Query(String),
}

pub use in_memory::InMemoryModelStore;
pub use model_repository::{ModelRepository, ModelsExt};
pub use query::{Condition, Filter, Op, Order, Query};
pub use store::ModelStore;
