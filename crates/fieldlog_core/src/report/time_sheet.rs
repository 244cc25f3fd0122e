//! Service records grouped for the time-sheet screen.

use crate::model::service_record::ServiceRecord;
use chrono::Datelike;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthBucket<'a> {
    /// Zero-based month index.
    pub month: u32,
    /// Newest first.
    pub records: Vec<&'a ServiceRecord>,
    pub time_ms: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearBucket<'a> {
    pub year: i32,
    /// Newest month first.
    pub months: Vec<MonthBucket<'a>>,
}

/// Groups records by year, then month, newest first at every level.
pub fn group_records_by_month(records: &[ServiceRecord]) -> Vec<YearBucket<'_>> {
    let mut tree: BTreeMap<i32, BTreeMap<u32, Vec<&ServiceRecord>>> = BTreeMap::new();
    for record in records {
        tree.entry(record.date.year())
            .or_default()
            .entry(record.date.month0())
            .or_default()
            .push(record);
    }

    tree.into_iter()
        .rev()
        .map(|(year, months)| YearBucket {
            year,
            months: months
                .into_iter()
                .rev()
                .map(|(month, mut records)| {
                    records.sort_by(|a, b| b.date.cmp(&a.date));
                    MonthBucket {
                        month,
                        time_ms: records.iter().map(|record| record.time).sum(),
                        records,
                    }
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::group_records_by_month;
    use crate::clock::HOUR_MS;
    use crate::model::service_record::ServiceRecord;
    use chrono::DateTime;

    fn record(date: &str, hours: i64) -> ServiceRecord {
        ServiceRecord::new(DateTime::parse_from_rfc3339(date).unwrap(), hours * HOUR_MS)
    }

    #[test]
    fn newest_year_and_month_come_first() {
        let records = vec![
            record("2023-12-01T10:00:00Z", 1),
            record("2024-02-03T10:00:00Z", 2),
            record("2024-02-20T10:00:00Z", 1),
            record("2024-01-15T10:00:00Z", 4),
        ];

        let years = group_records_by_month(&records);
        assert_eq!(years.iter().map(|y| y.year).collect::<Vec<_>>(), vec![2024, 2023]);

        let months_2024 = &years[0].months;
        assert_eq!(months_2024[0].month, 1);
        assert_eq!(months_2024[0].time_ms, 3 * HOUR_MS);
        assert_eq!(months_2024[0].records[0].date.to_rfc3339(), "2024-02-20T10:00:00+00:00");
        assert_eq!(months_2024[1].month, 0);
    }
}
