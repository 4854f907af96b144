//! ModelStore - Abstract CRUD storage for models.

use super::{Model, Query, StoreError, Versioned};

/// Abstract CRUD storage for models.
///
/// Implementations enforce each model's declared [`Constraint`](super::Constraint)s
/// on insert and update, and reject stale updates with
/// [`StoreError::ConcurrencyConflict`].
pub trait ModelStore: Send + Sync {
    /// Get a model by ID. Returns None if not found.
    fn get_model<M: Model>(&self, id: &str) -> Result<Option<Versioned<M>>, StoreError>;

    /// Insert a new model. Fails if it already exists or violates a constraint.
    fn insert_model<M: Model>(&self, model: &M) -> Result<Versioned<M>, StoreError>;

    /// Update an existing model with optimistic concurrency control.
    fn update_model<M: Model>(
        &self,
        model: &M,
        expected_version: u64,
    ) -> Result<Versioned<M>, StoreError>;

    /// Delete a model by ID. Returns true if it existed.
    fn delete_model<M: Model>(&self, id: &str) -> Result<bool, StoreError>;

    /// Find models matching a predicate, in store order.
    fn find_models<M: Model>(
        &self,
        predicate: &dyn Fn(&M) -> bool,
    ) -> Result<Vec<Versioned<M>>, StoreError>;

    /// Run a filter/order/limit query.
    fn query_models<M: Model>(&self, query: &Query) -> Result<Vec<Versioned<M>>, StoreError>;

    /// Run `f` atomically: if it returns `Err`, every write it made is undone.
    ///
    /// Transactions do not nest: calling this from inside `f` fails with
    /// `StoreError::Storage`. Stores without transaction support may rely on
    /// this default, which simply runs `f`.
    fn transaction<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: From<StoreError>,
    {
        f()
    }
}
