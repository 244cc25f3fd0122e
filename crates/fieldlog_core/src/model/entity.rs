//! Shared entity identity and lifecycle timestamps.

use crate::clock::Moment;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of an entity inside its collection.
///
/// Stored as a string so imported ids that are not UUIDs still round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Generates a fresh random (v4) identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for EntityId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Reference to an entity in another collection, serialized as `{ "id": .. }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: EntityId,
}

impl EntityRef {
    pub fn new(id: EntityId) -> Self {
        Self { id }
    }
}

/// Lifecycle stamps maintained by the store, never by callers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timestamps {
    /// Set once when the entity first enters its collection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Moment>,
    /// Set on every update of an existing entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<Moment>,
}

/// Contract every persisted collection member fulfils.
///
/// Optional fields must serialize with `skip_serializing_if = "Option::is_none"`
/// so that an omitted field keeps its stored value on upsert.
pub trait Entity: Clone + Serialize + DeserializeOwned {
    /// Blob key of the live collection.
    const STORAGE_KEY: &'static str;
    /// Short metadata label used in log events.
    const KIND: &'static str;

    fn id(&self) -> &EntityId;
    fn timestamps(&self) -> &Timestamps;
    fn timestamps_mut(&mut self) -> &mut Timestamps;
}

/// Entities that can be parked in a deleted partition and restored.
pub trait SoftDeletable: Entity {
    /// Blob key of the deleted partition.
    const DELETED_STORAGE_KEY: &'static str;

    fn deleted_at(&self) -> Option<&Moment>;
    fn set_deleted_at(&mut self, deleted_at: Option<Moment>);

    fn is_deleted(&self) -> bool {
        self.deleted_at().is_some()
    }
}
