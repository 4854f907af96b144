//! InMemoryModelStore - HashMap-backed model store for testing and development.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{
    Arc, Condvar, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard,
};
use std::thread::{self, ThreadId};

use serde_json::Value;
use tracing::debug;

use super::{Constraint, Model, ModelStore, Query, Relation, StoreError, Versioned};
use crate::clock::{Clock, SystemClock};

/// Internal stored representation of a model.
#[derive(Clone)]
struct StoredModel {
    bytes: Vec<u8>,
    version: u64,
    /// Insertion sequence; the store's natural order.
    seq: u64,
}

#[derive(Clone, Default)]
struct Tables {
    records: HashMap<String, StoredModel>,
    next_seq: u64,
}

/// Owner of the running transaction, if any.
///
/// While a thread owns the gate, writes from every other thread wait for
/// it to be released, so a rollback never undoes them.
#[derive(Default)]
struct TxGate {
    owner: Mutex<Option<ThreadId>>,
    released: Condvar,
}

impl TxGate {
    fn lock(&self) -> Result<MutexGuard<'_, Option<ThreadId>>, StoreError> {
        self.owner
            .lock()
            .map_err(|_| StoreError::Storage("transaction gate poisoned".into()))
    }

    /// Wait until no other thread's transaction is running. Hold the
    /// returned guard for the length of the write.
    fn write_turn(&self) -> Result<MutexGuard<'_, Option<ThreadId>>, StoreError> {
        let me = thread::current().id();
        let owner = self.lock()?;
        self.released
            .wait_while(owner, |owner| matches!(owner, Some(id) if *id != me))
            .map_err(|_| StoreError::Storage("transaction gate poisoned".into()))
    }

    fn begin(&self) -> Result<TxTurn<'_>, StoreError> {
        let me = thread::current().id();
        let owner = self.lock()?;
        if *owner == Some(me) {
            return Err(StoreError::Storage("nested transaction".into()));
        }
        let mut owner = self
            .released
            .wait_while(owner, |owner| owner.is_some())
            .map_err(|_| StoreError::Storage("transaction gate poisoned".into()))?;
        *owner = Some(me);
        Ok(TxTurn { gate: self })
    }
}

/// Releases the gate when the transaction ends, panics included.
struct TxTurn<'a> {
    gate: &'a TxGate,
}

impl Drop for TxTurn<'_> {
    fn drop(&mut self) {
        *self
            .gate
            .owner
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = None;
        self.gate.released.notify_all();
    }
}

/// In-memory model store backed by a HashMap.
///
/// Storage key is `"COLLECTION:id"`. Clone-friendly via Arc. One
/// transaction runs at a time and restores a snapshot on failure; writes
/// from other threads wait until it ends. Reads are not gated.
#[derive(Clone)]
pub struct InMemoryModelStore {
    storage: Arc<RwLock<Tables>>,
    relations: Arc<RwLock<HashMap<&'static str, &'static [Relation]>>>,
    gate: Arc<TxGate>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryModelStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryModelStore {
    /// Create a new empty model store using the system clock for date checks.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create a new empty model store whose check constraints see `clock`'s date.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            storage: Arc::new(RwLock::new(Tables::default())),
            relations: Arc::new(RwLock::new(HashMap::new())),
            gate: Arc::new(TxGate::default()),
            clock,
        }
    }

    fn make_key(collection: &str, id: &str) -> String {
        format!("{}:{}", collection, id)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.storage
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.storage
            .write()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))
    }

    /// Remember `M`'s relations so dotted paths through it can be resolved.
    fn register<M: Model>(&self) -> Result<(), StoreError> {
        let known = self
            .relations
            .read()
            .map_err(|_| StoreError::Storage("relation registry poisoned".into()))?
            .contains_key(M::COLLECTION);
        if !known {
            self.relations
                .write()
                .map_err(|_| StoreError::Storage("relation registry poisoned".into()))?
                .insert(M::COLLECTION, M::relations());
        }
        Ok(())
    }

    fn relation_target(&self, collection: &str, field: &str) -> Result<Option<&'static str>, StoreError> {
        let relations = self
            .relations
            .read()
            .map_err(|_| StoreError::Storage("relation registry poisoned".into()))?;
        Ok(relations.get(collection).and_then(|rels| {
            rels.iter()
                .find(|r| r.field == field)
                .map(|r| r.collection)
        }))
    }

    fn decode<M: Model>(bytes: &[u8]) -> Result<M, StoreError> {
        serde_json::from_slice(bytes).map_err(|e| StoreError::Serde(e.to_string()))
    }

    fn encode<M: Model>(model: &M) -> Result<Vec<u8>, StoreError> {
        serde_json::to_vec(model).map_err(|e| StoreError::Serde(e.to_string()))
    }

    /// Records of `collection` in insertion order.
    fn collection<'t>(tables: &'t Tables, collection: &str) -> Vec<(&'t str, &'t StoredModel)> {
        let prefix = format!("{}:", collection);
        let mut rows: Vec<_> = tables
            .records
            .iter()
            .filter_map(|(key, stored)| key.strip_prefix(&prefix).map(|id| (id, stored)))
            .collect();
        rows.sort_by_key(|(_, stored)| stored.seq);
        rows
    }

    fn check_constraints<M: Model>(&self, tables: &Tables, model: &M) -> Result<(), StoreError> {
        let constraints = M::constraints();
        if constraints.is_empty() {
            return Ok(());
        }

        let mut others: Option<Vec<M>> = None;
        let today = self.clock.today();

        for constraint in &constraints {
            match constraint {
                Constraint::Unique { key, .. } => {
                    let Some(own_key) = key(model) else {
                        continue;
                    };
                    if others.is_none() {
                        let mut decoded = Vec::new();
                        for (id, stored) in Self::collection(tables, M::COLLECTION) {
                            if id != model.id() {
                                decoded.push(Self::decode::<M>(&stored.bytes)?);
                            }
                        }
                        others = Some(decoded);
                    }
                    let collides = others
                        .iter()
                        .flatten()
                        .any(|other| key(other).as_deref() == Some(own_key.as_str()));
                    if collides {
                        return Err(constraint.violation());
                    }
                }
                Constraint::Check { check, .. } => {
                    if !check(model, today) {
                        return Err(constraint.violation());
                    }
                }
            }
        }

        Ok(())
    }

    /// Resolve a possibly dotted field path against a record's JSON form.
    fn resolve(
        &self,
        tables: &Tables,
        collection: &str,
        record: &Value,
        path: &str,
    ) -> Result<Value, StoreError> {
        let mut collection = collection.to_string();
        let mut current = record.clone();
        let mut segments = path.split('.').peekable();

        while let Some(field) = segments.next() {
            let value = current.get(field).cloned().unwrap_or(Value::Null);
            if segments.peek().is_none() {
                return Ok(value);
            }

            let target = self.relation_target(&collection, field)?.ok_or_else(|| {
                StoreError::Query(format!("{} is not a relation of {}", field, collection))
            })?;
            let Some(id) = value.as_str() else {
                return Ok(Value::Null);
            };
            let Some(stored) = tables.records.get(&Self::make_key(target, id)) else {
                return Ok(Value::Null);
            };
            current = serde_json::from_slice(&stored.bytes)
                .map_err(|e| StoreError::Serde(e.to_string()))?;
            collection = target.to_string();
        }

        Ok(Value::Null)
    }
}

impl ModelStore for InMemoryModelStore {
    fn get_model<M: Model>(&self, id: &str) -> Result<Option<Versioned<M>>, StoreError> {
        self.register::<M>()?;
        let key = Self::make_key(M::COLLECTION, id);
        let storage = self.read()?;

        match storage.records.get(&key) {
            Some(stored) => Ok(Some(Versioned {
                data: Self::decode(&stored.bytes)?,
                version: stored.version,
            })),
            None => Ok(None),
        }
    }

    fn insert_model<M: Model>(&self, model: &M) -> Result<Versioned<M>, StoreError> {
        self.register::<M>()?;
        let key = Self::make_key(M::COLLECTION, model.id());
        let bytes = Self::encode(model)?;

        let _turn = self.gate.write_turn()?;
        let mut storage = self.write()?;

        if let Some(existing) = storage.records.get(&key) {
            return Err(StoreError::ConcurrencyConflict {
                collection: M::COLLECTION.to_string(),
                id: model.id().to_string(),
                expected: 0,
                actual: existing.version,
            });
        }

        self.check_constraints(&storage, model)?;

        let seq = storage.next_seq;
        storage.next_seq += 1;
        storage.records.insert(
            key,
            StoredModel {
                bytes,
                version: 1,
                seq,
            },
        );

        Ok(Versioned {
            data: model.clone(),
            version: 1,
        })
    }

    fn update_model<M: Model>(
        &self,
        model: &M,
        expected_version: u64,
    ) -> Result<Versioned<M>, StoreError> {
        self.register::<M>()?;
        let key = Self::make_key(M::COLLECTION, model.id());
        let bytes = Self::encode(model)?;

        let _turn = self.gate.write_turn()?;
        let mut storage = self.write()?;

        let (actual_version, seq) = storage
            .records
            .get(&key)
            .map(|s| (s.version, s.seq))
            .ok_or_else(|| StoreError::NotFound {
                collection: M::COLLECTION.to_string(),
                id: model.id().to_string(),
            })?;

        if actual_version != expected_version {
            return Err(StoreError::ConcurrencyConflict {
                collection: M::COLLECTION.to_string(),
                id: model.id().to_string(),
                expected: expected_version,
                actual: actual_version,
            });
        }

        self.check_constraints(&storage, model)?;

        let new_version = actual_version + 1;
        storage.records.insert(
            key,
            StoredModel {
                bytes,
                version: new_version,
                seq,
            },
        );

        Ok(Versioned {
            data: model.clone(),
            version: new_version,
        })
    }

    fn delete_model<M: Model>(&self, id: &str) -> Result<bool, StoreError> {
        let key = Self::make_key(M::COLLECTION, id);
        let _turn = self.gate.write_turn()?;
        let mut storage = self.write()?;

        Ok(storage.records.remove(&key).is_some())
    }

    fn find_models<M: Model>(
        &self,
        predicate: &dyn Fn(&M) -> bool,
    ) -> Result<Vec<Versioned<M>>, StoreError> {
        self.register::<M>()?;
        let storage = self.read()?;
        let mut results = Vec::new();

        for (_, stored) in Self::collection(&storage, M::COLLECTION) {
            let data: M = Self::decode(&stored.bytes)?;
            if predicate(&data) {
                results.push(Versioned {
                    data,
                    version: stored.version,
                });
            }
        }

        Ok(results)
    }

    fn query_models<M: Model>(&self, query: &Query) -> Result<Vec<Versioned<M>>, StoreError> {
        self.register::<M>()?;
        let storage = self.read()?;

        struct Row {
            json: Value,
            keys: Vec<Value>,
            version: u64,
        }

        let mut rows = Vec::new();
        'records: for (_, stored) in Self::collection(&storage, M::COLLECTION) {
            let json: Value = serde_json::from_slice(&stored.bytes)
                .map_err(|e| StoreError::Serde(e.to_string()))?;

            for condition in query.filter.conditions() {
                let value = self.resolve(&storage, M::COLLECTION, &json, &condition.field)?;
                if !condition.matches(&value) {
                    continue 'records;
                }
            }

            let mut keys = Vec::with_capacity(query.order.len());
            for order in &query.order {
                keys.push(self.resolve(&storage, M::COLLECTION, &json, &order.field)?);
            }
            rows.push(Row {
                json,
                keys,
                version: stored.version,
            });
        }

        // Stable sort keeps insertion order between equal keys.
        rows.sort_by(|a, b| {
            query
                .order
                .iter()
                .zip(a.keys.iter().zip(&b.keys))
                .map(|(order, (ka, kb))| order.compare(ka, kb))
                .find(|ordering| *ordering != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });

        let limit = query.limit.unwrap_or(usize::MAX);
        rows.into_iter()
            .take(limit)
            .map(|row| {
                Ok(Versioned {
                    data: serde_json::from_value(row.json)
                        .map_err(|e| StoreError::Serde(e.to_string()))?,
                    version: row.version,
                })
            })
            .collect()
    }

    fn transaction<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: From<StoreError>,
    {
        let _turn = self.gate.begin()?;
        let snapshot = self.read()?.clone();

        match f() {
            Ok(value) => Ok(value),
            Err(err) => {
                *self.write()? = snapshot;
                debug!("transaction rolled back");
                Err(err)
            }
        }
    }
}
