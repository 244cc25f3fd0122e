//! Month report aggregation and share formatting.

use super::{MonthReportData, ReportContext, ReportInput, ReportTotals, ShareContent};
use crate::clock::{is_same_month_and_year, resolve_year, Moment, HOUR_MS};
use crate::i18n::{
    Translator, KEY_HOURS, KEY_PLACEMENTS, KEY_RETURN_VISITS, KEY_SERVICE_REPORT, KEY_STUDIES,
    KEY_VIDEO_PLACEMENTS, MONTH_KEYS,
};
use crate::model::service_record::ServiceRecord;
use crate::model::visit::Visit;
use crate::rules::{derive_standing, return_visits_in_month, visits_for_call};

/// Aggregates one month of activity.
///
/// `month` is zero-based. `year` of `None` or `Some(0)` means the clock's
/// current year.
///
/// # Contract
/// - Hours are floored from the summed milliseconds.
/// - Placement counts are offset sums plus visits carrying a placement.
/// - Return visits skip each call's first visit (see `ReportPolicy`).
/// - Studies count each study-standing call once if it was visited.
///   Standing is derived from the call's visits in `input`. The cached
///   `Call::is_study` flag is not read, so a stale flag neither adds nor
///   hides a study.
pub fn parse_for_month_report(
    input: &ReportInput<'_>,
    month: u32,
    year: Option<i32>,
    ctx: &ReportContext<'_>,
) -> MonthReportData {
    let year = resolve_year(year.unwrap_or(0), ctx.clock);
    let in_month = |date: &Moment| is_same_month_and_year(date, month, year, ctx.clock);

    let visits_this_month = input
        .visits
        .iter()
        .filter(|visit| in_month(&visit.date))
        .collect::<Vec<&Visit>>();
    let records_this_month = input
        .records
        .iter()
        .filter(|record| in_month(&record.date))
        .collect::<Vec<&ServiceRecord>>();

    let time_ms = records_this_month.iter().map(|record| record.time).sum::<i64>();
    let hours = time_ms.div_euclid(HOUR_MS);

    let placement_offset = sum_by(&records_this_month, |record| record.placements);
    let video_placement_offset = sum_by(&records_this_month, |record| record.video_placements);
    let return_visit_offset = sum_by(&records_this_month, |record| {
        ctx.policy.return_visit_offset.read(record)
    });
    let study_offset = sum_by(&records_this_month, |record| record.study_offset);

    let placements_this_month = count(&visits_this_month, Visit::has_placement);
    let video_placements_this_month = count(&visits_this_month, Visit::has_video_placement);

    let mut automated_return_visits = 0_i64;
    let mut automated_studies = 0_i64;
    for call in input.calls {
        let call_visits = visits_for_call(input.visits, &call.id, ctx.policy.visit_order);
        automated_return_visits += to_i64(return_visits_in_month(
            &call_visits,
            month,
            year,
            ctx.clock,
        ));

        let visited_this_month = visits_this_month
            .iter()
            .any(|visit| visit.call_id() == &call.id);
        if visited_this_month && derive_standing(call_visits.len()).is_study {
            automated_studies += 1;
        }
    }

    let totals = ReportTotals {
        hours,
        placements: placement_offset + placements_this_month,
        video_placements: video_placement_offset + video_placements_this_month,
        return_visits: automated_return_visits + return_visit_offset,
        studies: Some(automated_studies + study_offset),
    };

    let title = report_title(month, year, ctx.translator);
    let message = format!(
        "{title}\n{}",
        format_report_for_sharing(&totals, ctx.translator)
    )
    .trim()
    .to_string();

    MonthReportData {
        hours: totals.hours,
        placements: totals.placements,
        video_placements: totals.video_placements,
        return_visits: totals.return_visits,
        studies: totals.studies.unwrap_or(0),
        month,
        year,
        share: ShareContent { title, message },
    }
}

/// `"{Month}, {Year} {Service Report}"`, dropping absent pieces.
///
/// A month index outside `0..12` drops the month name; a year of `0` drops
/// the year.
pub fn report_title(month: u32, year: i32, translator: &dyn Translator) -> String {
    let month_display = usize::try_from(month)
        .ok()
        .and_then(|index| MONTH_KEYS.get(index))
        .map(|key| translator.translate(key));
    let label = translator.translate(KEY_SERVICE_REPORT);

    match (month_display, year) {
        (Some(month_name), 0) => format!("{month_name} {label}"),
        (Some(month_name), year) => format!("{month_name}, {year} {label}"),
        (None, 0) => label,
        (None, year) => format!("{year} {label}"),
    }
}

/// One `"{label}: {value}"` line per counter.
///
/// The studies line is left out when studies is zero or absent.
pub fn format_report_for_sharing(totals: &ReportTotals, translator: &dyn Translator) -> String {
    let mut lines = vec![
        (KEY_HOURS, totals.hours),
        (KEY_PLACEMENTS, totals.placements),
        (KEY_VIDEO_PLACEMENTS, totals.video_placements),
        (KEY_RETURN_VISITS, totals.return_visits),
    ];
    if let Some(studies) = totals.studies.filter(|studies| *studies != 0) {
        lines.push((KEY_STUDIES, studies));
    }

    lines
        .into_iter()
        .map(|(key, value)| format!("{}: {value}", translator.translate(key)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn sum_by(records: &[&ServiceRecord], field: impl Fn(&ServiceRecord) -> i64) -> i64 {
    records.iter().map(|record| field(*record)).sum()
}

fn count(visits: &[&Visit], predicate: impl Fn(&Visit) -> bool) -> i64 {
    to_i64(visits.iter().filter(|visit| predicate(**visit)).count())
}

fn to_i64(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
