//! Live/deleted partitioning with recover and purge.
//!
//! # Responsibility
//! - Move entities between a live and a deleted collection.
//! - Stamp and clear the deletion timestamp on the way.
//!
//! # Invariants
//! - An id lives in at most one partition at a time. A load that finds an id
//!   in both keeps the deleted copy.
//! - Moving between partitions preserves `created_at` and stamps `last_updated`.
//! - Writes go to the destination partition before the source is trimmed.

use super::{EntityStore, StoreError, StoreResult};
use crate::clock::SharedClock;
use crate::model::entity::{EntityId, SoftDeletable};
use crate::storage::BlobStore;
use log::{info, warn};

/// Display order of the deleted partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeletedOrder {
    /// Newest `created_at` first.
    #[default]
    CreatedAtDesc,
    /// Newest `deleted_at` first, ties broken by `created_at`.
    DeletedAtDesc,
}

impl DeletedOrder {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "created_at" | "created" => Some(Self::CreatedAtDesc),
            "deleted_at" | "deleted" => Some(Self::DeletedAtDesc),
            _ => None,
        }
    }
}

pub struct SoftDeleteRegistry<E: SoftDeletable, B: BlobStore + Clone> {
    live: EntityStore<E, B>,
    deleted: EntityStore<E, B>,
    order: DeletedOrder,
}

impl<E: SoftDeletable, B: BlobStore + Clone> SoftDeleteRegistry<E, B> {
    /// Loads both partitions.
    ///
    /// A move interrupted between its two writes leaves the id in both blobs.
    /// Such ids are dropped from the live partition, which is persisted again.
    pub fn load(backend: B, clock: SharedClock, order: DeletedOrder) -> Self {
        let mut live: EntityStore<E, B> =
            EntityStore::load_with_key(E::STORAGE_KEY, backend.clone(), clock.clone());
        let deleted: EntityStore<E, B> =
            EntityStore::load_with_key(E::DELETED_STORAGE_KEY, backend, clock);

        let overlap = live.remove_where(|entity| deleted.contains(entity.id()));
        if !overlap.is_empty() {
            warn!(
                "event=store_load module=store status=error kind={} error_code=partition_overlap count={}",
                E::KIND,
                overlap.len()
            );
        }

        Self {
            live,
            deleted,
            order,
        }
    }

    /// Inserts or merges into the live partition.
    ///
    /// # Errors
    /// - `EntityDeleted` when the id currently sits in the deleted partition.
    /// - `InvalidPatch` from the underlying merge.
    pub fn upsert(&mut self, entity: E) -> StoreResult<()> {
        if self.deleted.contains(entity.id()) {
            return Err(StoreError::EntityDeleted {
                kind: E::KIND,
                id: entity.id().clone(),
            });
        }
        self.live.upsert(entity)
    }

    pub fn live(&self) -> &[E] {
        self.live.list()
    }

    pub fn get(&self, id: &EntityId) -> Option<&E> {
        self.live.get(id)
    }

    /// Deleted partition in the configured display order.
    pub fn deleted(&self) -> Vec<&E> {
        let mut items = self.deleted.list().iter().collect::<Vec<_>>();
        match self.order {
            DeletedOrder::CreatedAtDesc => {
                items.sort_by(|a, b| b.timestamps().created_at.cmp(&a.timestamps().created_at))
            }
            DeletedOrder::DeletedAtDesc => items.sort_by(|a, b| {
                b.deleted_at()
                    .cmp(&a.deleted_at())
                    .then_with(|| b.timestamps().created_at.cmp(&a.timestamps().created_at))
            }),
        }
        items
    }

    pub fn get_deleted(&self, id: &EntityId) -> Option<&E> {
        self.deleted.get(id)
    }

    /// Parks a live entity in the deleted partition. Returns whether it moved.
    pub fn soft_delete(&mut self, id: &EntityId) -> bool {
        let Some(mut entity) = self.live.get(id).cloned() else {
            return false;
        };
        let now = self.live.now();
        entity.set_deleted_at(Some(now));
        entity.timestamps_mut().last_updated = Some(now);
        self.deleted.put_unstamped(entity);
        self.live.remove(id);
        info!("event=soft_delete module=store status=ok kind={}", E::KIND);
        true
    }

    /// Moves a deleted entity back to live. Returns whether it moved.
    pub fn recover(&mut self, id: &EntityId) -> bool {
        let Some(mut entity) = self.deleted.get(id).cloned() else {
            return false;
        };
        entity.set_deleted_at(None);
        entity.timestamps_mut().last_updated = Some(self.deleted.now());
        self.live.put_unstamped(entity);
        self.deleted.remove(id);
        info!("event=recover module=store status=ok kind={}", E::KIND);
        true
    }

    /// Permanently drops an entity from the deleted partition.
    ///
    /// Live entities are not purged; soft-delete them first.
    pub fn purge(&mut self, id: &EntityId) -> Option<E> {
        let purged = self.deleted.remove(id)?;
        info!("event=purge module=store status=ok kind={}", E::KIND);
        Some(purged)
    }

    /// Clears both partitions.
    pub fn remove_all(&mut self) {
        self.live.remove_all();
        self.deleted.remove_all();
    }
}
