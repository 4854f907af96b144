//! ModelRepository - Typed accessor for model CRUD operations.

use std::marker::PhantomData;

use super::{Model, ModelStore, Query, StoreError, Versioned};

/// Typed view of one collection in a [`ModelStore`].
///
/// The `*_records` variants drop the versions for callers that only read.
pub struct ModelRepository<'a, S, M> {
    store: &'a S,
    _marker: PhantomData<M>,
}

impl<'a, S: ModelStore, M: Model> ModelRepository<'a, S, M> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    pub fn get(&self, id: &str) -> Result<Option<Versioned<M>>, StoreError> {
        self.store.get_model(id)
    }

    /// Like [`get`](Self::get), but a missing record is `StoreError::NotFound`.
    pub fn fetch(&self, id: &str) -> Result<Versioned<M>, StoreError> {
        self.store
            .get_model(id)?
            .ok_or_else(|| StoreError::NotFound {
                collection: M::COLLECTION.to_string(),
                id: id.to_string(),
            })
    }

    pub fn exists(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.store.get_model::<M>(id)?.is_some())
    }

    pub fn insert(&self, model: &M) -> Result<Versioned<M>, StoreError> {
        self.store.insert_model(model)
    }

    /// Update with optimistic concurrency: `expected_version` must match.
    pub fn update(&self, model: &M, expected_version: u64) -> Result<Versioned<M>, StoreError> {
        self.store.update_model(model, expected_version)
    }

    pub fn delete(&self, id: &str) -> Result<bool, StoreError> {
        self.store.delete_model::<M>(id)
    }

    pub fn find(&self, predicate: &dyn Fn(&M) -> bool) -> Result<Vec<Versioned<M>>, StoreError> {
        self.store.find_models(predicate)
    }

    pub fn find_records(&self, predicate: &dyn Fn(&M) -> bool) -> Result<Vec<M>, StoreError> {
        Ok(strip(self.store.find_models(predicate)?))
    }

    /// Whether any stored record matches `predicate`.
    pub fn any(&self, predicate: &dyn Fn(&M) -> bool) -> Result<bool, StoreError> {
        Ok(!self.store.find_models(predicate)?.is_empty())
    }

    pub fn query(&self, query: &Query) -> Result<Vec<Versioned<M>>, StoreError> {
        self.store.query_models(query)
    }

    pub fn query_records(&self, query: &Query) -> Result<Vec<M>, StoreError> {
        Ok(strip(self.store.query_models(query)?))
    }
}

fn strip<M>(rows: Vec<Versioned<M>>) -> Vec<M> {
    rows.into_iter().map(|v| v.data).collect()
}

/// Extension trait for typed model access on any ModelStore.
pub trait ModelsExt: ModelStore + Sized {
    fn models<M: Model>(&self) -> ModelRepository<'_, Self, M> {
        ModelRepository::new(self)
    }
}

impl<S: ModelStore> ModelsExt for S {}
