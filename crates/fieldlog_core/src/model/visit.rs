//! Visit domain model.

use crate::clock::Moment;
use crate::model::entity::{Entity, EntityId, EntityRef, Timestamps};
use serde::{Deserialize, Serialize};

/// Planned follow-up recorded on a visit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextVisit {
    pub date: Moment,
    /// Whether the user asked for a reminder.
    #[serde(default)]
    pub notify: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scripture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// One interaction with a call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visit {
    pub id: EntityId,
    pub call: EntityRef,
    pub date: Moment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_placement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partners: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_visit: Option<NextVisit>,
    #[serde(flatten)]
    pub stamps: Timestamps,
}

impl Visit {
    /// Creates an unsaved visit to `call_id` with a generated id.
    pub fn new(call_id: EntityId, date: Moment) -> Self {
        Self {
            id: EntityId::generate(),
            call: EntityRef::new(call_id),
            date,
            topic: None,
            note: None,
            placement: None,
            video_placement: None,
            partners: None,
            next_visit: None,
            stamps: Timestamps::default(),
        }
    }

    pub fn call_id(&self) -> &EntityId {
        &self.call.id
    }

    /// A placement counts only when some text was entered.
    pub fn has_placement(&self) -> bool {
        self.placement.as_deref().is_some_and(|value| !value.is_empty())
    }

    pub fn has_video_placement(&self) -> bool {
        self.video_placement
            .as_deref()
            .is_some_and(|value| !value.is_empty())
    }
}

impl Entity for Visit {
    const STORAGE_KEY: &'static str = "visitStore";
    const KIND: &'static str = "visit";

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
