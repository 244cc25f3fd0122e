//! Localization lookup seam.
//!
//! Core code only asks for strings by key and passes the result through.
//! Catalogs are flat `key -> text` JSON objects, the same shape as the app's
//! translation files.

use once_cell::sync::Lazy;
use std::collections::HashMap;

pub const KEY_SERVICE_REPORT: &str = "serviceReport";
pub const KEY_HOURS: &str = "hours";
pub const KEY_PLACEMENTS: &str = "placements";
pub const KEY_VIDEO_PLACEMENTS: &str = "videoPlacements";
pub const KEY_RETURN_VISITS: &str = "returnVisits";
pub const KEY_STUDIES: &str = "studies";

/// Month name keys, indexed by zero-based month.
pub const MONTH_KEYS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

static ENGLISH: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (KEY_SERVICE_REPORT, "Service Report"),
        (KEY_HOURS, "Hours"),
        (KEY_PLACEMENTS, "Placements"),
        (KEY_VIDEO_PLACEMENTS, "Video Placements"),
        (KEY_RETURN_VISITS, "Return Visits"),
        (KEY_STUDIES, "Studies"),
        ("january", "January"),
        ("february", "February"),
        ("march", "March"),
        ("april", "April"),
        ("may", "May"),
        ("june", "June"),
        ("july", "July"),
        ("august", "August"),
        ("september", "September"),
        ("october", "October"),
        ("november", "November"),
        ("december", "December"),
    ])
});

pub trait Translator {
    fn translate(&self, key: &str) -> String;
}

/// Built-in English strings. Unknown keys come back unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishCatalog;

impl Translator for EnglishCatalog {
    fn translate(&self, key: &str) -> String {
        ENGLISH.get(key).map_or_else(|| key.to_string(), |text| (*text).to_string())
    }
}

/// Catalog loaded from a translation file, falling back to English.
#[derive(Debug, Clone, Default)]
pub struct CatalogTranslator {
    entries: HashMap<String, String>,
}

impl CatalogTranslator {
    /// Parses a flat JSON object of string values.
    ///
    /// Non-string values are skipped.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let parsed = serde_json::from_str::<HashMap<String, serde_json::Value>>(raw)?;
        let entries = parsed
            .into_iter()
            .filter_map(|(key, value)| match value {
                serde_json::Value::String(text) => Some((key, text)),
                _ => None,
            })
            .collect();
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Translator for CatalogTranslator {
    fn translate(&self, key: &str) -> String {
        match self.entries.get(key) {
            Some(text) => text.clone(),
            None => EnglishCatalog.translate(key),
        }
    }
}
