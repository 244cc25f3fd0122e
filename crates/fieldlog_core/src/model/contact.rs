//! Contact and conversation models.
//!
//! # Invariants
//! - `deleted_at` present means the contact lives in the deleted partition.
//! - Conversations point back to their contact via `contact.id`.

use crate::clock::Moment;
use crate::model::call::Address;
use crate::model::entity::{Entity, EntityId, EntityRef, SoftDeletable, Timestamps};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: EntityId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<Moment>,
    #[serde(flatten)]
    pub stamps: Timestamps,
}

impl Contact {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(EntityId::generate(), name)
    }

    pub fn with_id(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            address: None,
            phone: None,
            email: None,
            deleted_at: None,
            stamps: Timestamps::default(),
        }
    }
}

impl Entity for Contact {
    const STORAGE_KEY: &'static str = "contacts";
    const KIND: &'static str = "contact";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn timestamps(&self) -> &Timestamps {
        &self.stamps
    }

    fn timestamps_mut(&mut self) -> &mut Timestamps {
        &mut self.stamps
    }
}

impl SoftDeletable for Contact {
    const DELETED_STORAGE_KEY: &'static str = "deletedContacts";

    fn deleted_at(&self) -> Option<&Moment> {
        self.deleted_at.as_ref()
    }

    fn set_deleted_at(&mut self, deleted_at: Option<Moment>) {
        self.deleted_at = deleted_at;
    }
}

/// Reminder attached to a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowUp {
    pub date: Moment,
    #[serde(default)]
    pub notify: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: EntityId,
    pub contact: EntityRef,
    pub date: Moment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up: Option<FollowUp>,
    #[serde(flatten)]
    pub stamps: Timestamps,
}

impl Conversation {
    pub fn new(contact_id: EntityId, date: Moment) -> Self {
        Self {
            id: EntityId::generate(),
            contact: EntityRef::new(contact_id),
            date,
            note: None,
            follow_up: None,
            stamps: Timestamps::default(),
        }
    }

    pub fn contact_id(&self) -> &EntityId {
        &self.contact.id
    }

    /// Follow-up is still ahead of (or exactly at) `now`.
    pub fn has_pending_follow_up(&self, now: &Moment) -> bool {
        self.follow_up
            .as_ref()
            .is_some_and(|follow_up| follow_up.date >= *now)
    }
}

impl Entity for Conversation {
    const STORAGE_KEY: &'static str = "conversations";
    const KIND: &'static str = "conversation";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn timestamps(&self) -> &Timestamps {
        &self.stamps
    }

    fn timestamps_mut(&mut self) -> &mut Timestamps {
        &mut self.stamps
    }
}
