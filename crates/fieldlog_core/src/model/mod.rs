//! Domain model for calls, visits, time records and contacts.
//!
//! # Responsibility
//! - Define the JSON shapes persisted in each entity collection.
//! - Provide the [`entity::Entity`] contract the generic store relies on.
//!
//! # Invariants
//! - Every entity is identified by a stable `EntityId`.
//! - Entities never embed another collection's records, only `{ id }` refs.

pub mod call;
pub mod contact;
pub mod entity;
pub mod service_record;
pub mod visit;
