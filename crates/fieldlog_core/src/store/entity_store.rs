//! Generic ordered entity collection persisted as one JSON blob.
//!
//! # Responsibility
//! - Keep the in-memory collection for one entity kind.
//! - Apply upsert/merge semantics and lifecycle stamps.
//! - Mirror the whole collection to the blob backend after each mutation.
//!
//! # Invariants
//! - Ids are unique inside the collection; insertion order is preserved.
//! - `created_at` is written once on insert and survives every update.
//! - Persistence failures are logged, never returned; memory stays
//!   authoritative for the session.

use super::{StoreError, StoreResult};
use crate::clock::{Moment, SharedClock};
use crate::model::entity::{Entity, EntityId};
use crate::storage::BlobStore;
use log::{debug, error, info, warn};
use serde_json::{Map, Value};

pub struct EntityStore<E: Entity, B: BlobStore> {
    key: &'static str,
    items: Vec<E>,
    backend: B,
    clock: SharedClock,
}

impl<E: Entity, B: BlobStore> EntityStore<E, B> {
    /// Loads the collection stored under `E::STORAGE_KEY`.
    pub fn load(backend: B, clock: SharedClock) -> Self {
        Self::load_with_key(E::STORAGE_KEY, backend, clock)
    }

    /// Loads a collection stored under an explicit key.
    ///
    /// A missing blob yields an empty collection. An unreadable or corrupt
    /// blob is logged and also yields an empty collection.
    pub fn load_with_key(key: &'static str, backend: B, clock: SharedClock) -> Self {
        let items = match backend.get_item(key) {
            Ok(None) => Vec::new(),
            Ok(Some(payload)) => match serde_json::from_str::<Vec<E>>(&payload) {
                Ok(items) => items,
                Err(err) => {
                    error!(
                        "event=store_load module=store status=error kind={} key={key} error_code=blob_corrupt error={err}",
                        E::KIND
                    );
                    Vec::new()
                }
            },
            Err(err) => {
                error!(
                    "event=store_load module=store status=error kind={} key={key} error_code=blob_read_failed error={err}",
                    E::KIND
                );
                Vec::new()
            }
        };

        info!(
            "event=store_load module=store status=ok kind={} key={key} count={}",
            E::KIND,
            items.len()
        );

        Self {
            key,
            items,
            backend,
            clock,
        }
    }

    /// Current collection in insertion order.
    pub fn list(&self) -> &[E] {
        &self.items
    }

    pub fn get(&self, id: &EntityId) -> Option<&E> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.position(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Inserts a new entity or merges into the stored one with the same id.
    ///
    /// On merge, every field `entity` serializes overwrites the stored value;
    /// optional fields left as `None` keep what was stored.
    pub fn upsert(&mut self, entity: E) -> StoreResult<()> {
        match self.position(entity.id()) {
            None => {
                self.append_new(entity);
            }
            Some(index) => {
                let patch = serde_json::to_value(&entity).map_err(|err| {
                    StoreError::invalid_patch::<E>(entity.id(), err.to_string())
                })?;
                self.merge_at(index, patch)?;
            }
        }
        self.persist();
        Ok(())
    }

    /// Same merge as [`EntityStore::upsert`], driven by a raw JSON object.
    ///
    /// An explicit `null` clears an optional field. For an unknown id the
    /// patch must describe a complete entity. The `id` key is always forced
    /// to `id`.
    pub fn upsert_patch(&mut self, id: &EntityId, patch: Value) -> StoreResult<()> {
        let Value::Object(mut fields) = patch else {
            return Err(StoreError::invalid_patch::<E>(id, "patch must be a JSON object"));
        };
        fields.insert("id".to_string(), Value::String(id.to_string()));

        match self.position(id) {
            None => {
                let entity = serde_json::from_value::<E>(Value::Object(fields))
                    .map_err(|err| StoreError::invalid_patch::<E>(id, err.to_string()))?;
                self.append_new(entity);
            }
            Some(index) => self.merge_at(index, Value::Object(fields))?,
        }
        self.persist();
        Ok(())
    }

    /// Applies `change` to the stored entity and stamps `last_updated`.
    ///
    /// Returns `false` (and does nothing) when the id is absent.
    pub fn modify(&mut self, id: &EntityId, change: impl FnOnce(&mut E)) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        let now = self.now();
        let item = &mut self.items[index];
        change(item);
        item.timestamps_mut().last_updated = Some(now);
        self.persist();
        true
    }

    /// Removes the entity with `id`. Absent ids are a no-op.
    pub fn remove(&mut self, id: &EntityId) -> Option<E> {
        let index = self.position(id)?;
        let removed = self.items.remove(index);
        self.persist();
        Some(removed)
    }

    /// Removes every entity matching `predicate` with a single persist.
    pub fn remove_where(&mut self, mut predicate: impl FnMut(&E) -> bool) -> Vec<E> {
        let (removed, kept): (Vec<E>, Vec<E>) =
            std::mem::take(&mut self.items).into_iter().partition(|item| predicate(item));
        self.items = kept;
        if !removed.is_empty() {
            self.persist();
        }
        removed
    }

    pub fn remove_all(&mut self) {
        self.items.clear();
        self.persist();
    }

    /// Stores `entity` as-is, replacing any entry with the same id.
    ///
    /// Used when moving records between partitions, where the lifecycle
    /// stamps must be carried over untouched.
    pub(crate) fn put_unstamped(&mut self, entity: E) {
        match self.position(entity.id()) {
            Some(index) => self.items[index] = entity,
            None => self.items.push(entity),
        }
        self.persist();
    }

    pub(crate) fn now(&self) -> Moment {
        self.clock.now()
    }

    fn position(&self, id: &EntityId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    fn append_new(&mut self, mut entity: E) {
        entity.timestamps_mut().created_at = Some(self.now());
        debug!(
            "event=store_upsert module=store status=ok kind={} op=insert",
            E::KIND
        );
        self.items.push(entity);
    }

    fn merge_at(&mut self, index: usize, patch: Value) -> StoreResult<()> {
        let stored = &self.items[index];
        let id = stored.id().clone();
        let mut merged = serde_json::to_value(stored)
            .map_err(|err| StoreError::invalid_patch::<E>(&id, err.to_string()))?;

        match (merged.as_object_mut(), patch) {
            (Some(target), Value::Object(fields)) => overlay(target, fields),
            _ => return Err(StoreError::invalid_patch::<E>(&id, "entity is not a JSON object")),
        }

        let mut entity = serde_json::from_value::<E>(merged)
            .map_err(|err| StoreError::invalid_patch::<E>(&id, err.to_string()))?;
        let created_at = stored.timestamps().created_at;
        let stamps = entity.timestamps_mut();
        stamps.created_at = created_at;
        stamps.last_updated = Some(self.now());

        debug!(
            "event=store_upsert module=store status=ok kind={} op=merge",
            E::KIND
        );
        self.items[index] = entity;
        Ok(())
    }

    fn persist(&self) {
        let payload = match serde_json::to_string(&self.items) {
            Ok(payload) => payload,
            Err(err) => {
                error!(
                    "event=store_persist module=store status=error kind={} key={} error_code=serialize_failed error={err}",
                    E::KIND,
                    self.key
                );
                return;
            }
        };

        if let Err(err) = self.backend.set_item(self.key, &payload) {
            warn!(
                "event=store_persist module=store status=error kind={} key={} error_code=blob_write_failed error={err}",
                E::KIND,
                self.key
            );
        }
    }
}

/// Shallow field overwrite, mirroring object spread.
fn overlay(target: &mut Map<String, Value>, fields: Map<String, Value>) {
    let id = target.get("id").cloned();
    for (key, value) in fields {
        target.insert(key, value);
    }
    if let Some(id) = id {
        target.insert("id".to_string(), id);
    }
}
