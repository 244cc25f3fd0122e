//! Core use-case services.
//!
//! # Responsibility
//! - Coordinate stores that reference each other (calls/visits,
//!   contacts/conversations) and keep cascades and caches consistent.
//! - Keep UI/FFI layers decoupled from storage details.

use crate::model::entity::EntityId;
use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod call_service;
pub mod contact_service;
pub mod session;

pub use call_service::CallService;
pub use contact_service::ContactService;
pub use session::{FieldLog, SessionOptions};

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    Store(StoreError),
    /// A visit referenced a call that is not in the call collection.
    UnknownCall(EntityId),
    /// A conversation referenced a contact that is not live.
    UnknownContact(EntityId),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::UnknownCall(id) => write!(f, "call not found: {id}"),
            Self::UnknownContact(id) => write!(f, "contact not found: {id}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}
