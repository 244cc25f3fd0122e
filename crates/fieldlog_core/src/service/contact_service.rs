//! Contact + conversation use-cases.
//!
//! # Invariants
//! - Soft delete and recover never touch conversations.
//! - Purging a contact hard-deletes every conversation pointing at it.

use super::{ServiceError, ServiceResult};
use crate::clock::{Moment, SharedClock};
use crate::model::contact::{Contact, Conversation};
use crate::model::entity::EntityId;
use crate::storage::BlobStore;
use crate::store::{DeletedOrder, EntityStore, SoftDeleteRegistry};
use log::info;

pub struct ContactService<B: BlobStore + Clone> {
    contacts: SoftDeleteRegistry<Contact, B>,
    conversations: EntityStore<Conversation, B>,
}

impl<B: BlobStore + Clone> ContactService<B> {
    pub fn load(backend: B, clock: SharedClock, deleted_order: DeletedOrder) -> Self {
        Self {
            contacts: SoftDeleteRegistry::load(backend.clone(), clock.clone(), deleted_order),
            conversations: EntityStore::load(backend, clock),
        }
    }

    pub fn contacts(&self) -> &[Contact] {
        self.contacts.live()
    }

    pub fn deleted_contacts(&self) -> Vec<&Contact> {
        self.contacts.deleted()
    }

    pub fn get_contact(&self, id: &EntityId) -> Option<&Contact> {
        self.contacts.get(id)
    }

    pub fn save_contact(&mut self, contact: Contact) -> ServiceResult<()> {
        self.contacts.upsert(contact)?;
        Ok(())
    }

    /// Moves a contact to the deleted list. Absent ids are a no-op.
    pub fn delete_contact(&mut self, id: &EntityId) -> bool {
        self.contacts.soft_delete(id)
    }

    pub fn recover_contact(&mut self, id: &EntityId) -> bool {
        self.contacts.recover(id)
    }

    /// Permanently removes a deleted contact and its conversations.
    ///
    /// Returns the number of conversations removed, or `None` when `id` was
    /// not in the deleted list.
    pub fn purge_contact(&mut self, id: &EntityId) -> Option<usize> {
        self.contacts.purge(id)?;
        let removed = self
            .conversations
            .remove_where(|conversation| conversation.contact_id() == id)
            .len();
        info!(
            "event=contact_purge module=service status=ok cascaded_conversations={removed}"
        );
        Some(removed)
    }

    /// Clears live contacts, deleted contacts and conversations.
    pub fn remove_all(&mut self) {
        self.conversations.remove_all();
        self.contacts.remove_all();
    }

    pub fn conversations(&self) -> &[Conversation] {
        self.conversations.list()
    }

    /// Creates or merges a conversation for a live contact.
    ///
    /// # Errors
    /// - `UnknownContact` when the contact is missing or soft-deleted.
    pub fn save_conversation(&mut self, conversation: Conversation) -> ServiceResult<()> {
        if self.contacts.get(conversation.contact_id()).is_none() {
            return Err(ServiceError::UnknownContact(
                conversation.contact_id().clone(),
            ));
        }
        self.conversations.upsert(conversation)?;
        Ok(())
    }

    pub fn delete_conversation(&mut self, id: &EntityId) -> Option<Conversation> {
        self.conversations.remove(id)
    }

    /// Conversations of one contact, newest first.
    pub fn conversations_for(&self, contact_id: &EntityId) -> Vec<&Conversation> {
        let mut items = self
            .conversations
            .list()
            .iter()
            .filter(|conversation| conversation.contact_id() == contact_id)
            .collect::<Vec<_>>();
        items.sort_by(|a, b| b.date.cmp(&a.date));
        items
    }

    /// Pending follow-ups of live contacts, soonest first.
    pub fn pending_follow_ups(&self, now: &Moment) -> Vec<&Conversation> {
        let mut items = self
            .conversations
            .list()
            .iter()
            .filter(|conversation| conversation.has_pending_follow_up(now))
            .filter(|conversation| self.contacts.get(conversation.contact_id()).is_some())
            .collect::<Vec<_>>();
        items.sort_by_key(|conversation| conversation.follow_up.as_ref().map(|f| f.date));
        items
    }
}
