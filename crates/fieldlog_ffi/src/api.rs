//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Open one short-lived session per call so UI code never owns a handle.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Month indices are zero-based; a missing or `0` year is the current year.
//! - Timestamps cross the boundary as Unix epoch milliseconds.

use fieldlog_core::clock::moment_from_epoch_ms;
use fieldlog_core::db::open_db;
use fieldlog_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, Call, Contact,
    CoreConfig, EnglishCatalog, EntityId, FieldLog, MonthReportData, ServiceRecord,
    SqliteBlobStore, SystemClock, Visit,
};
use log::warn;
use std::sync::{Arc, OnceLock};

static SESSION_CONFIG: OnceLock<Result<CoreConfig, String>> = OnceLock::new();

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Reconfiguration attempts with different level or directory return error.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Id of the created or touched entity.
    pub id: Option<String>,
    /// Dependent rows removed by a cascade, when the action has one.
    pub cascaded: Option<u32>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, id: String) -> Self {
        Self {
            ok: true,
            id: Some(id),
            cascaded: None,
            message: message.into(),
        }
    }

    fn cascade(message: impl Into<String>, id: String, removed: usize) -> Self {
        Self {
            cascaded: Some(u32::try_from(removed).unwrap_or(u32::MAX)),
            ..Self::success(message, id)
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            cascaded: None,
            message: message.into(),
        }
    }
}

/// Month statistics plus the share sheet payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthReportView {
    pub month: u32,
    pub year: i32,
    pub hours: i64,
    pub placements: i64,
    pub video_placements: i64,
    pub return_visits: i64,
    pub studies: i64,
    pub share_title: String,
    pub share_message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthReportResponse {
    /// `None` when the session could not be opened.
    pub report: Option<MonthReportView>,
    pub message: String,
}

/// Row of the "recently deleted" contact list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletedContactItem {
    pub id: String,
    pub name: String,
    pub deleted_at_epoch_ms: Option<i64>,
}

/// Creates a call with the given display name.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn create_call(name: String) -> ActionResponse {
    let call = Call::new(name.trim());
    let id = call.id.to_string();
    match with_session(|log| log.calls_mut().save_call(call).map_err(|err| err.to_string())) {
        Ok(()) => ActionResponse::success("Call created.", id),
        Err(err) => failure("create_call", err),
    }
}

/// Records a visit at `epoch_ms` for an existing call.
///
/// Blank placement strings count as no placement.
#[flutter_rust_bridge::frb(sync)]
pub fn record_visit(
    call_id: String,
    epoch_ms: i64,
    placement: Option<String>,
    video_placement: Option<String>,
) -> ActionResponse {
    let Some(date) = moment_from_epoch_ms(epoch_ms) else {
        return ActionResponse::failure(format!("record_visit failed: invalid epoch_ms {epoch_ms}"));
    };
    let mut visit = Visit::new(EntityId::from(call_id.trim()), date);
    visit.placement = placement;
    visit.video_placement = video_placement;
    let id = visit.id.to_string();
    match with_session(|log| log.calls_mut().save_visit(visit).map_err(|err| err.to_string())) {
        Ok(()) => ActionResponse::success("Visit recorded.", id),
        Err(err) => failure("record_visit", err),
    }
}

/// Deletes a call and every visit attached to it.
#[flutter_rust_bridge::frb(sync)]
pub fn delete_call(call_id: String) -> ActionResponse {
    let id = EntityId::from(call_id.trim());
    match with_session(|log| Ok(log.calls_mut().delete_call(&id))) {
        Ok(Some(removed)) => ActionResponse::cascade("Call deleted.", id.to_string(), removed),
        Ok(None) => ActionResponse::failure(format!("delete_call failed: call not found: {id}")),
        Err(err) => failure("delete_call", err),
    }
}

/// Logs field service time on `epoch_ms`.
#[flutter_rust_bridge::frb(sync)]
pub fn record_service_time(epoch_ms: i64, hours: i64, minutes: i64) -> ActionResponse {
    let Some(date) = moment_from_epoch_ms(epoch_ms) else {
        return ActionResponse::failure(format!(
            "record_service_time failed: invalid epoch_ms {epoch_ms}"
        ));
    };
    if hours < 0 || !(0..60).contains(&minutes) {
        return ActionResponse::failure(
            "record_service_time failed: expected hours >= 0 and minutes in 0..60",
        );
    }
    let Some(record) = ServiceRecord::from_hours_minutes(date, hours, minutes) else {
        return ActionResponse::failure(format!(
            "record_service_time failed: {hours}h {minutes}m is too long to record"
        ));
    };
    let id = record.id.to_string();
    match with_session(|log| log.records_mut().upsert(record).map_err(|err| err.to_string())) {
        Ok(()) => ActionResponse::success("Service time recorded.", id),
        Err(err) => failure("record_service_time", err),
    }
}

/// Computes the report for zero-based `month` of `year`.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; `report` is `None` on failure and `message` says why.
#[flutter_rust_bridge::frb(sync)]
pub fn month_report(month: u32, year: Option<i32>) -> MonthReportResponse {
    if month > 11 {
        return MonthReportResponse {
            report: None,
            message: format!("month_report failed: month must be 0..=11, got {month}"),
        };
    }
    match with_session(|log| Ok(log.month_report(month, year, &EnglishCatalog))) {
        Ok(data) => MonthReportResponse {
            report: Some(to_month_report_view(data)),
            message: "Report ready.".to_string(),
        },
        Err(err) => MonthReportResponse {
            report: None,
            message: format!("month_report failed: {err}"),
        },
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn create_contact(name: String) -> ActionResponse {
    let contact = Contact::new(name.trim());
    let id = contact.id.to_string();
    match with_session(|log| {
        log.contacts_mut()
            .save_contact(contact)
            .map_err(|err| err.to_string())
    }) {
        Ok(()) => ActionResponse::success("Contact created.", id),
        Err(err) => failure("create_contact", err),
    }
}

/// Moves a contact to the recently deleted list.
#[flutter_rust_bridge::frb(sync)]
pub fn soft_delete_contact(contact_id: String) -> ActionResponse {
    let id = EntityId::from(contact_id.trim());
    match with_session(|log| Ok(log.contacts_mut().delete_contact(&id))) {
        Ok(true) => ActionResponse::success("Contact deleted.", id.to_string()),
        Ok(false) => ActionResponse::failure(format!(
            "soft_delete_contact failed: contact not found: {id}"
        )),
        Err(err) => failure("soft_delete_contact", err),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn recover_contact(contact_id: String) -> ActionResponse {
    let id = EntityId::from(contact_id.trim());
    match with_session(|log| Ok(log.contacts_mut().recover_contact(&id))) {
        Ok(true) => ActionResponse::success("Contact recovered.", id.to_string()),
        Ok(false) => ActionResponse::failure(format!(
            "recover_contact failed: deleted contact not found: {id}"
        )),
        Err(err) => failure("recover_contact", err),
    }
}

/// Permanently removes a deleted contact and its conversations.
#[flutter_rust_bridge::frb(sync)]
pub fn purge_contact(contact_id: String) -> ActionResponse {
    let id = EntityId::from(contact_id.trim());
    match with_session(|log| Ok(log.contacts_mut().purge_contact(&id))) {
        Ok(Some(removed)) => ActionResponse::cascade("Contact purged.", id.to_string(), removed),
        Ok(None) => ActionResponse::failure(format!(
            "purge_contact failed: deleted contact not found: {id}"
        )),
        Err(err) => failure("purge_contact", err),
    }
}

/// Deleted contacts in the configured display order.
///
/// Returns an empty list when the session cannot be opened.
#[flutter_rust_bridge::frb(sync)]
pub fn list_deleted_contacts() -> Vec<DeletedContactItem> {
    let listed = with_session(|log| {
        Ok(log
            .contacts()
            .deleted_contacts()
            .into_iter()
            .map(|contact| DeletedContactItem {
                id: contact.id.to_string(),
                name: contact.name.clone(),
                deleted_at_epoch_ms: contact.deleted_at.map(|at| at.timestamp_millis()),
            })
            .collect::<Vec<_>>())
    });
    match listed {
        Ok(items) => items,
        Err(err) => {
            warn!("event=ffi_call module=ffi status=error op=list_deleted_contacts error={err}");
            Vec::new()
        }
    }
}

fn failure(op: &str, err: String) -> ActionResponse {
    warn!("event=ffi_call module=ffi status=error op={op}");
    ActionResponse::failure(format!("{op} failed: {err}"))
}

fn resolve_config() -> Result<&'static CoreConfig, String> {
    SESSION_CONFIG
        .get_or_init(|| CoreConfig::from_env().map_err(|err| err.to_string()))
        .as_ref()
        .map_err(Clone::clone)
}

fn with_session<T>(
    f: impl FnOnce(&mut FieldLog<SqliteBlobStore<'_>>) -> Result<T, String>,
) -> Result<T, String> {
    let config = resolve_config()?;
    let conn = open_db(&config.db_path).map_err(|err| format!("DB open failed: {err}"))?;
    let mut log = FieldLog::load(
        SqliteBlobStore::new(&conn),
        Arc::new(SystemClock),
        config.session,
    );
    f(&mut log)
}

fn to_month_report_view(data: MonthReportData) -> MonthReportView {
    MonthReportView {
        month: data.month,
        year: data.year,
        hours: data.hours,
        placements: data.placements,
        video_placements: data.video_placements,
        return_visits: data.return_visits,
        studies: data.studies,
        share_title: data.share.title,
        share_message: data.share.message,
    }
}
