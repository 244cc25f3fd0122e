use fieldlog_core::clock::HOUR_MS;
use fieldlog_core::{
    Call, Clock, Entity, EntityId, EntityStore, ManualClock, MemoryBlobStore, ServiceRecord,
    SharedClock, StoreError,
};
use serde_json::json;
use std::sync::Arc;

fn clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::at_utc(2024, 3, 15).unwrap())
}

#[test]
fn upsert_then_list_holds_exactly_one_entity_per_id() {
    let backend = MemoryBlobStore::new();
    let shared: SharedClock = clock();
    let mut store = EntityStore::<Call, _>::load(&backend, shared);

    let call = Call::with_id(EntityId::from("c1"), "Ana");
    store.upsert(call.clone()).unwrap();
    store.upsert(call).unwrap();
    store.upsert(Call::with_id(EntityId::from("c2"), "Ben")).unwrap();

    let ids = store
        .list()
        .iter()
        .map(|call| call.id.as_str())
        .collect::<Vec<_>>();
    assert_eq!(ids, vec!["c1", "c2"]);
}

#[test]
fn partial_upsert_preserves_fields_not_in_input() {
    let backend = MemoryBlobStore::new();
    let shared: SharedClock = clock();
    let mut store = EntityStore::<Call, _>::load(&backend, shared);
    let id = EntityId::from("c1");

    let mut original = Call::with_id(id.clone(), "Ana");
    original.note = Some("likes gardening".to_string());
    original.preferred_visit_time = Some("evenings".to_string());
    store.upsert(original).unwrap();

    let mut update = Call::with_id(id.clone(), "Ana Maria");
    update.note = Some("moved upstairs".to_string());
    store.upsert(update).unwrap();

    let stored = store.get(&id).unwrap();
    assert_eq!(stored.name, "Ana Maria");
    assert_eq!(stored.note.as_deref(), Some("moved upstairs"));
    assert_eq!(stored.preferred_visit_time.as_deref(), Some("evenings"));
}

#[test]
fn json_patch_null_clears_optional_field() {
    let backend = MemoryBlobStore::new();
    let shared: SharedClock = clock();
    let mut store = EntityStore::<Call, _>::load(&backend, shared);
    let id = EntityId::from("c1");

    let mut original = Call::with_id(id.clone(), "Ana");
    original.note = Some("temporary".to_string());
    store.upsert(original).unwrap();

    store.upsert_patch(&id, json!({ "note": null })).unwrap();
    assert_eq!(store.get(&id).unwrap().note, None);
    assert_eq!(store.get(&id).unwrap().name, "Ana");
}

#[test]
fn json_patch_for_unknown_id_must_be_complete() {
    let backend = MemoryBlobStore::new();
    let shared: SharedClock = clock();
    let mut store = EntityStore::<Call, _>::load(&backend, shared);

    let err = store
        .upsert_patch(&EntityId::from("new"), json!({ "note": "no name" }))
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidPatch { kind: "call", .. }));
    assert!(store.is_empty());

    store
        .upsert_patch(&EntityId::from("new"), json!({ "name": "Cleo" }))
        .unwrap();
    assert_eq!(store.len(), 1);

    let err = store
        .upsert_patch(&EntityId::from("new"), json!(["not", "an", "object"]))
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidPatch { .. }));
}

#[test]
fn created_at_is_set_once_and_last_updated_on_every_update() {
    let backend = MemoryBlobStore::new();
    let manual = clock();
    let shared: SharedClock = manual.clone();
    let mut store = EntityStore::<Call, _>::load(&backend, shared);
    let id = EntityId::from("c1");

    store.upsert(Call::with_id(id.clone(), "Ana")).unwrap();
    let created_at = store.get(&id).unwrap().timestamps().created_at.unwrap();
    assert!(store.get(&id).unwrap().timestamps().last_updated.is_none());

    manual.advance_ms(HOUR_MS);
    let mut forged = Call::with_id(id.clone(), "Ana");
    forged.stamps.created_at = Some(manual.now());
    store.upsert(forged).unwrap();

    let stamps = store.get(&id).unwrap().timestamps().clone();
    assert_eq!(stamps.created_at, Some(created_at));
    assert_eq!(
        stamps.last_updated.unwrap() - created_at,
        chrono::Duration::hours(1)
    );
}

#[test]
fn remove_is_idempotent() {
    let backend = MemoryBlobStore::new();
    let shared: SharedClock = clock();
    let mut store = EntityStore::<Call, _>::load(&backend, shared);
    let id = EntityId::from("c1");
    store.upsert(Call::with_id(id.clone(), "Ana")).unwrap();
    store.upsert(Call::with_id(EntityId::from("c2"), "Ben")).unwrap();

    assert!(store.remove(&id).is_some());
    let after_first = store.list().to_vec();
    assert!(store.remove(&id).is_none());
    assert_eq!(store.list(), after_first.as_slice());
}

#[test]
fn remove_all_empties_the_collection() {
    let backend = MemoryBlobStore::new();
    let shared: SharedClock = clock();
    let mut store = EntityStore::<Call, _>::load(&backend, shared.clone());
    store.upsert(Call::new("Ana")).unwrap();
    store.remove_all();
    assert!(store.is_empty());

    let reloaded = EntityStore::<Call, _>::load(&backend, shared);
    assert!(reloaded.is_empty());
}

#[test]
fn reload_restores_collection_in_order() {
    let backend = MemoryBlobStore::new();
    let shared: SharedClock = clock();
    let mut store = EntityStore::<ServiceRecord, _>::load(&backend, shared.clone());
    let now = shared.now();
    store.upsert(ServiceRecord::new(now, HOUR_MS)).unwrap();
    store.upsert(ServiceRecord::new(now, 2 * HOUR_MS)).unwrap();

    let reloaded = EntityStore::<ServiceRecord, _>::load(&backend, shared);
    assert_eq!(reloaded.list(), store.list());
}

#[test]
fn failed_writes_keep_in_memory_state() {
    let backend = MemoryBlobStore::new();
    let shared: SharedClock = clock();
    let mut store = EntityStore::<Call, _>::load(&backend, shared.clone());
    store.upsert(Call::with_id(EntityId::from("c1"), "Ana")).unwrap();

    backend.set_reject_writes(true);
    store.upsert(Call::with_id(EntityId::from("c2"), "Ben")).unwrap();
    assert_eq!(store.len(), 2);

    // The rejected mutation is lost on restart; the earlier one survives.
    let reloaded = EntityStore::<Call, _>::load(&backend, shared);
    assert_eq!(reloaded.len(), 1);
}

#[test]
fn corrupt_blob_loads_as_empty_collection() {
    let backend = MemoryBlobStore::new();
    fieldlog_core::BlobStore::set_item(&backend, Call::STORAGE_KEY, "{not json").unwrap();
    let shared: SharedClock = clock();

    let store = EntityStore::<Call, _>::load(&backend, shared);
    assert!(store.is_empty());
}
