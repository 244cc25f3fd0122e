//! Calendar-year roll-up of month reports.

use super::month::{parse_for_month_report, report_title};
use super::{MonthReportData, ReportContext, ReportInput, ReportTotals};
use crate::clock::{resolve_year, HOUR_MS};
use chrono::Datelike;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnualReportData {
    pub year: i32,
    /// January through December.
    pub months: Vec<MonthReportData>,
    pub totals: ReportTotals,
    pub title: String,
}

/// Builds twelve month reports and their totals for `year`.
///
/// Hours are floored once from the year's summed milliseconds, so partial
/// hours spread across months still add up. Other totals sum the months.
pub fn parse_for_annual_report(
    input: &ReportInput<'_>,
    year: Option<i32>,
    ctx: &ReportContext<'_>,
) -> AnnualReportData {
    let year = resolve_year(year.unwrap_or(0), ctx.clock);
    let months = (0..12)
        .map(|month| parse_for_month_report(input, month, Some(year), ctx))
        .collect::<Vec<_>>();

    let year_ms = input
        .records
        .iter()
        .filter(|record| record.date.year() == year)
        .map(|record| record.time)
        .sum::<i64>();

    let totals = ReportTotals {
        hours: year_ms.div_euclid(HOUR_MS),
        placements: months.iter().map(|month| month.placements).sum(),
        video_placements: months.iter().map(|month| month.video_placements).sum(),
        return_visits: months.iter().map(|month| month.return_visits).sum(),
        studies: Some(months.iter().map(|month| month.studies).sum()),
    };

    AnnualReportData {
        year,
        months,
        totals,
        title: report_title(u32::MAX, year, ctx.translator),
    }
}
