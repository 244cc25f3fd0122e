//! Call domain model.
//!
//! # Invariants
//! - Visits are never embedded in a call; they point back via `call.id`.
//! - `is_study` / `is_return_visit` are a cache of [`crate::rules::derive_standing`]
//!   and are refreshed by the call service whenever the call's visits change.

use crate::model::entity::{Entity, EntityId, Timestamps};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// How receptive a call is. Unknown labels are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InterestLevel {
    NotInterested,
    LittleInterested,
    Interested,
    Hungry,
    Other(String),
}

impl InterestLevel {
    /// Known levels in ascending order of interest.
    pub const KNOWN: [InterestLevel; 4] = [
        InterestLevel::NotInterested,
        InterestLevel::LittleInterested,
        InterestLevel::Interested,
        InterestLevel::Hungry,
    ];

    pub fn parse(label: &str) -> Self {
        match label.trim() {
            "not-interested" => Self::NotInterested,
            "little-interested" => Self::LittleInterested,
            "interested" => Self::Interested,
            "hungry" => Self::Hungry,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::NotInterested => "not-interested",
            Self::LittleInterested => "little-interested",
            Self::Interested => "interested",
            Self::Hungry => "hungry",
            Self::Other(label) => label.as_str(),
        }
    }
}

impl Serialize for InterestLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for InterestLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Self::parse(&label))
    }
}

/// Geocoded position of an address.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// Structured postal address. Every part is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinate>,
}

impl Address {
    /// Single-line form used for display and geocoding queries.
    ///
    /// Empty parts are skipped and embedded line breaks are dropped.
    pub fn display_line(&self) -> String {
        [
            &self.line1,
            &self.line2,
            &self.city,
            &self.state,
            &self.postal_code,
            &self.country,
        ]
        .into_iter()
        .filter_map(|part| part.as_deref())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .replace(['\r', '\n'], "")
    }

    /// Returns `true` when no textual part carries a value.
    pub fn is_blank(&self) -> bool {
        self.display_line().trim().is_empty()
    }
}

/// A person or household being visited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Call {
    pub id: EntityId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_level: Option<InterestLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_visit_time: Option<String>,
    #[serde(default)]
    pub is_study: bool,
    #[serde(default)]
    pub is_return_visit: bool,
    #[serde(flatten)]
    pub stamps: Timestamps,
}

impl Call {
    /// Creates an unsaved call with a generated id.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(EntityId::generate(), name)
    }

    pub fn with_id(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            address: None,
            note: None,
            interest_level: None,
            preferred_visit_time: None,
            is_study: false,
            is_return_visit: false,
            stamps: Timestamps::default(),
        }
    }
}

impl Entity for Call {
    const STORAGE_KEY: &'static str = "callStore";
    const KIND: &'static str = "call";

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

#[cfg(test)]
mod tests {
    use super::{Address, Call, InterestLevel};

    #[test]
    fn interest_level_keeps_unknown_labels() {
        let parsed: InterestLevel = serde_json::from_str("\"curious\"").unwrap();
        assert_eq!(parsed, InterestLevel::Other("curious".to_string()));
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"curious\"");

        let known: InterestLevel = serde_json::from_str("\"little-interested\"").unwrap();
        assert_eq!(known, InterestLevel::LittleInterested);
    }

    #[test]
    fn display_line_skips_empty_parts_and_line_breaks() {
        let address = Address {
            line1: Some("12 Main\nSt".to_string()),
            line2: Some(String::new()),
            city: Some("Springfield".to_string()),
            postal_code: Some("01101".to_string()),
            ..Address::default()
        };
        assert_eq!(address.display_line(), "12 MainSt Springfield 01101");
        assert!(Address::default().is_blank());
    }

    #[test]
    fn call_json_uses_camel_case_and_omits_absent_fields() {
        let call = Call::with_id("c1".into(), "Ana");
        let json = serde_json::to_value(&call).unwrap();
        assert_eq!(json["isStudy"], false);
        assert!(json.get("address").is_none());
        assert!(json.get("createdAt").is_none());
    }
}
