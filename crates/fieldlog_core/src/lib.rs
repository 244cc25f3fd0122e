//! Core domain logic for fieldlog.
//! This crate is the single source of truth for stored activity and the
//! statistics derived from it.

pub mod clock;
pub mod config;
pub mod db;
pub mod i18n;
pub mod logging;
pub mod model;
pub mod report;
pub mod rules;
pub mod service;
pub mod storage;
pub mod store;

pub use clock::{Clock, ManualClock, Moment, SharedClock, SystemClock};
pub use config::{ConfigError, CoreConfig};
pub use i18n::{CatalogTranslator, EnglishCatalog, Translator};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::call::{Address, Call, Coordinate, InterestLevel};
pub use model::contact::{Contact, Conversation, FollowUp};
pub use model::entity::{Entity, EntityId, EntityRef, SoftDeletable, Timestamps};
pub use model::service_record::ServiceRecord;
pub use model::visit::{NextVisit, Visit};
pub use report::{
    format_report_for_sharing, parse_for_annual_report, parse_for_month_report, AnnualReportData,
    MonthReportData, ReportContext, ReportInput, ReportPolicy, ReportTotals,
    ReturnVisitOffsetSource, ShareContent,
};
pub use service::{CallService, ContactService, FieldLog, ServiceError, ServiceResult, SessionOptions};
pub use storage::{BlobError, BlobStore, MemoryBlobStore, SqliteBlobStore};
pub use store::{DeletedOrder, EntityStore, SoftDeleteRegistry, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
