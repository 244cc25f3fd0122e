//! In-memory entity collections mirrored to blob storage.
//!
//! # Responsibility
//! - One generic store type used for every entity kind.
//! - Soft-delete partitioning for entities that support recovery.
//!
//! # Invariants
//! - Not-found on remove/modify paths is a no-op, never an error.
//! - Only malformed input is reported through `StoreError`.

use crate::model::entity::{Entity, EntityId};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod entity_store;
pub mod soft_delete;

pub use entity_store::EntityStore;
pub use soft_delete::{DeletedOrder, SoftDeleteRegistry};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Input could not be merged into a valid entity.
    InvalidPatch {
        kind: &'static str,
        id: EntityId,
        reason: String,
    },
    /// Live upsert addressed an entity parked in the deleted partition.
    EntityDeleted { kind: &'static str, id: EntityId },
}

impl StoreError {
    pub(crate) fn invalid_patch<E: Entity>(id: &EntityId, reason: impl Into<String>) -> Self {
        Self::InvalidPatch {
            kind: E::KIND,
            id: id.clone(),
            reason: reason.into(),
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPatch { kind, id, reason } => {
                write!(f, "invalid {kind} patch for `{id}`: {reason}")
            }
            Self::EntityDeleted { kind, id } => {
                write!(f, "{kind} `{id}` is deleted; recover it before editing")
            }
        }
    }
}

impl Error for StoreError {}
