use fieldlog_core::clock::HOUR_MS;
use fieldlog_core::{
    BlobStore, Clock, Contact, ContactService, Conversation, DeletedOrder, EntityId, FollowUp,
    ManualClock, MemoryBlobStore, ServiceError, SharedClock, StoreError,
};
use std::sync::Arc;

fn manual_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::at_utc(2024, 5, 10).unwrap())
}

fn contact(id: &str, name: &str) -> Contact {
    Contact::with_id(EntityId::from(id), name)
}

#[test]
fn soft_delete_then_recover_restores_same_contact() {
    let backend = MemoryBlobStore::new();
    let manual = manual_clock();
    let clock: SharedClock = manual.clone();
    let mut service = ContactService::load(&backend, clock, DeletedOrder::default());
    let id = EntityId::from("k1");

    let mut original = contact("k1", "Dana");
    original.phone = Some("555-0100".to_string());
    service.save_contact(original).unwrap();
    let before = service.get_contact(&id).unwrap().clone();

    manual.advance_ms(HOUR_MS);
    assert!(service.delete_contact(&id));
    assert!(service.get_contact(&id).is_none());
    let deleted = service.deleted_contacts();
    assert_eq!(deleted.len(), 1);
    assert_eq!(deleted[0].deleted_at, Some(manual.now()));
    assert_eq!(deleted[0].stamps.last_updated, Some(manual.now()));

    manual.advance_ms(HOUR_MS);
    assert!(service.recover_contact(&id));
    let after = service.get_contact(&id).unwrap();
    assert_eq!(after.name, before.name);
    assert_eq!(after.phone, before.phone);
    assert_eq!(after.stamps.created_at, before.stamps.created_at);
    assert_eq!(after.stamps.last_updated, Some(manual.now()));
    assert!(after.deleted_at.is_none());
    assert!(service.deleted_contacts().is_empty());
}

#[test]
fn load_drops_live_copies_of_deleted_contacts() {
    let backend = MemoryBlobStore::new();
    let clock: SharedClock = manual_clock();
    let stranded = r#"[{"id":"k1","name":"Dana"},{"id":"k2","name":"Eli"}]"#;
    backend.set_item("contacts", stranded).unwrap();
    backend
        .set_item(
            "deletedContacts",
            r#"[{"id":"k1","name":"Dana","deletedAt":"2024-05-09T08:00:00+00:00"}]"#,
        )
        .unwrap();

    let service = ContactService::load(&backend, clock.clone(), DeletedOrder::default());
    let live = service
        .contacts()
        .iter()
        .map(|contact| contact.id.as_str())
        .collect::<Vec<_>>();
    assert_eq!(live, vec!["k2"]);
    assert_eq!(service.deleted_contacts().len(), 1);

    let reloaded = ContactService::load(&backend, clock, DeletedOrder::default());
    assert_eq!(reloaded.contacts().len(), 1);
    assert!(!backend.get_item("contacts").unwrap().unwrap().contains("Dana"));
}

#[test]
fn soft_delete_and_recover_are_no_ops_for_unknown_ids() {
    let backend = MemoryBlobStore::new();
    let clock: SharedClock = manual_clock();
    let mut service = ContactService::load(&backend, clock, DeletedOrder::default());

    assert!(!service.delete_contact(&EntityId::from("ghost")));
    assert!(!service.recover_contact(&EntityId::from("ghost")));
    assert_eq!(service.purge_contact(&EntityId::from("ghost")), None);
}

#[test]
fn soft_delete_leaves_conversations_and_purge_cascades() {
    let backend = MemoryBlobStore::new();
    let manual = manual_clock();
    let clock: SharedClock = manual.clone();
    let mut service = ContactService::load(&backend, clock, DeletedOrder::default());
    let kept = EntityId::from("k1");
    let purged = EntityId::from("k2");
    service.save_contact(contact("k1", "Dana")).unwrap();
    service.save_contact(contact("k2", "Eli")).unwrap();

    let now = manual.now();
    service
        .save_conversation(Conversation::new(kept.clone(), now))
        .unwrap();
    service
        .save_conversation(Conversation::new(purged.clone(), now))
        .unwrap();
    service
        .save_conversation(Conversation::new(purged.clone(), now))
        .unwrap();

    assert!(service.delete_contact(&purged));
    assert_eq!(service.conversations_for(&purged).len(), 2);

    assert_eq!(service.purge_contact(&purged), Some(2));
    assert!(service.conversations_for(&purged).is_empty());
    assert_eq!(service.conversations_for(&kept).len(), 1);
    assert!(service.deleted_contacts().is_empty());
}

#[test]
fn live_contacts_cannot_be_purged() {
    let backend = MemoryBlobStore::new();
    let clock: SharedClock = manual_clock();
    let mut service = ContactService::load(&backend, clock, DeletedOrder::default());
    let id = EntityId::from("k1");
    service.save_contact(contact("k1", "Dana")).unwrap();

    assert_eq!(service.purge_contact(&id), None);
    assert!(service.get_contact(&id).is_some());
}

#[test]
fn editing_a_deleted_contact_is_rejected() {
    let backend = MemoryBlobStore::new();
    let clock: SharedClock = manual_clock();
    let mut service = ContactService::load(&backend, clock, DeletedOrder::default());
    let id = EntityId::from("k1");
    service.save_contact(contact("k1", "Dana")).unwrap();
    service.delete_contact(&id);

    let err = service.save_contact(contact("k1", "Dana 2")).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Store(StoreError::EntityDeleted { .. })
    ));
    let err = service
        .save_conversation(Conversation::new(id.clone(), chrono::Utc::now().fixed_offset()))
        .unwrap_err();
    assert_eq!(err, ServiceError::UnknownContact(id));
}

#[test]
fn deleted_order_by_created_at_versus_deleted_at() {
    let backend = MemoryBlobStore::new();
    let manual = manual_clock();
    let clock: SharedClock = manual.clone();

    {
        let mut service = ContactService::load(&backend, clock.clone(), DeletedOrder::default());
        service.save_contact(contact("old", "Created first")).unwrap();
        manual.advance_ms(HOUR_MS);
        service.save_contact(contact("new", "Created second")).unwrap();
        manual.advance_ms(HOUR_MS);
        // Delete the newer one first, then the older one.
        service.delete_contact(&EntityId::from("new"));
        manual.advance_ms(HOUR_MS);
        service.delete_contact(&EntityId::from("old"));
    }

    let by_created = ContactService::load(&backend, clock.clone(), DeletedOrder::CreatedAtDesc);
    let names = by_created
        .deleted_contacts()
        .iter()
        .map(|contact| contact.id.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["new", "old"]);

    let by_deleted = ContactService::load(&backend, clock, DeletedOrder::DeletedAtDesc);
    let names = by_deleted
        .deleted_contacts()
        .iter()
        .map(|contact| contact.id.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["old", "new"]);
}

#[test]
fn pending_follow_ups_skip_past_and_deleted_contacts() {
    let backend = MemoryBlobStore::new();
    let manual = manual_clock();
    let clock: SharedClock = manual.clone();
    let mut service = ContactService::load(&backend, clock, DeletedOrder::default());
    service.save_contact(contact("k1", "Dana")).unwrap();
    service.save_contact(contact("k2", "Eli")).unwrap();
    let now = manual.now();

    let with_follow_up = |contact_id: &str, offset_hours: i64| {
        let mut conversation = Conversation::new(EntityId::from(contact_id), now);
        conversation.follow_up = Some(FollowUp {
            date: now + chrono::Duration::hours(offset_hours),
            notify: true,
            topic: None,
        });
        conversation
    };
    let later = with_follow_up("k1", 48);
    let sooner = with_follow_up("k1", 2);
    let past = with_follow_up("k1", -2);
    let hidden = with_follow_up("k2", 1);
    let (later_id, sooner_id) = (later.id.clone(), sooner.id.clone());
    for conversation in [later, sooner, past, hidden] {
        service.save_conversation(conversation).unwrap();
    }
    service.delete_contact(&EntityId::from("k2"));

    let pending = service
        .pending_follow_ups(&now)
        .iter()
        .map(|conversation| conversation.id.clone())
        .collect::<Vec<_>>();
    assert_eq!(pending, vec![sooner_id, later_id]);
}
