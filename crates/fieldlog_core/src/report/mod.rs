//! Activity aggregation over calls, visits and service records.
//!
//! # Responsibility
//! - Turn raw collections into monthly and annual statistics.
//! - Compose the human-readable title/message pair used for sharing.
//!
//! # Invariants
//! - Every function here is pure: same inputs and clock, same output.
//! - Empty input yields zero counts, never an error.

use crate::clock::Clock;
use crate::i18n::Translator;
use crate::model::call::Call;
use crate::model::service_record::ServiceRecord;
use crate::model::visit::Visit;
use crate::rules::VisitOrder;
use serde::Serialize;

pub mod annual;
pub mod month;
pub mod time_sheet;

pub use annual::{parse_for_annual_report, AnnualReportData};
pub use month::{format_report_for_sharing, parse_for_month_report, report_title};
pub use time_sheet::{group_records_by_month, MonthBucket, YearBucket};

/// Where the manual return-visit offset is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReturnVisitOffsetSource {
    /// Sum of `placements`. Matches what users of the existing app see.
    #[default]
    Placements,
    /// Sum of the dedicated `returnVisitOffset` field.
    ReturnVisitOffset,
}

impl ReturnVisitOffsetSource {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "placements" => Some(Self::Placements),
            "return_visit_offset" | "returnvisitoffset" => Some(Self::ReturnVisitOffset),
            _ => None,
        }
    }

    pub(crate) fn read(self, record: &ServiceRecord) -> i64 {
        match self {
            Self::Placements => record.placements,
            Self::ReturnVisitOffset => record.return_visit_offset,
        }
    }
}

/// Tunable aggregation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReportPolicy {
    pub return_visit_offset: ReturnVisitOffsetSource,
    pub visit_order: VisitOrder,
}

/// Borrowed view of the three collections a report reads.
#[derive(Debug, Clone, Copy)]
pub struct ReportInput<'a> {
    pub calls: &'a [Call],
    pub visits: &'a [Visit],
    pub records: &'a [ServiceRecord],
}

/// Everything a report needs besides the data.
#[derive(Clone, Copy)]
pub struct ReportContext<'a> {
    pub clock: &'a dyn Clock,
    pub translator: &'a dyn Translator,
    pub policy: ReportPolicy,
}

/// Counters shown on a report card and in the share message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportTotals {
    pub hours: i64,
    pub placements: i64,
    pub video_placements: i64,
    pub return_visits: i64,
    /// `None` and `Some(0)` both hide the studies line when sharing.
    pub studies: Option<i64>,
}

/// Payload handed to the OS share sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareContent {
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthReportData {
    pub hours: i64,
    pub placements: i64,
    pub video_placements: i64,
    pub return_visits: i64,
    pub studies: i64,
    /// Zero-based month index.
    pub month: u32,
    /// Resolved year (never `0`).
    pub year: i32,
    pub share: ShareContent,
}

impl MonthReportData {
    pub fn totals(&self) -> ReportTotals {
        ReportTotals {
            hours: self.hours,
            placements: self.placements,
            video_placements: self.video_placements,
            return_visits: self.return_visits,
            studies: Some(self.studies),
        }
    }
}
