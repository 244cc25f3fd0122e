use chrono::DateTime;
use fieldlog_core::db::open_db;
use fieldlog_core::{
    Call, Contact, Conversation, EnglishCatalog, EntityId, FieldLog, ManualClock, Moment,
    ServiceRecord, SessionOptions, SharedClock, SqliteBlobStore, Visit,
};
use std::sync::Arc;

fn at(raw: &str) -> Moment {
    DateTime::parse_from_rfc3339(raw).unwrap()
}

fn shared_clock() -> SharedClock {
    Arc::new(ManualClock::at_utc(2024, 3, 28).unwrap())
}

#[test]
fn collections_survive_reopening_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fieldlog.db");
    let call_id = EntityId::from("c1");
    let contact_id = EntityId::from("k1");

    {
        let conn = open_db(&path).unwrap();
        let mut log = FieldLog::load(
            SqliteBlobStore::new(&conn),
            shared_clock(),
            SessionOptions::default(),
        );
        log.calls_mut()
            .save_call(Call::with_id(call_id.clone(), "Birch Lane"))
            .unwrap();
        for date in ["2024-02-10T10:00:00Z", "2024-03-02T10:00:00Z", "2024-03-09T10:00:00Z"] {
            log.calls_mut()
                .save_visit(Visit::new(call_id.clone(), at(date)))
                .unwrap();
        }
        let record = ServiceRecord::from_hours_minutes(at("2024-03-02T09:00:00Z"), 2, 30).unwrap();
        log.records_mut().upsert(record).unwrap();
        log.contacts_mut()
            .save_contact(Contact::with_id(contact_id.clone(), "Dana"))
            .unwrap();
        log.contacts_mut()
            .save_conversation(Conversation::new(contact_id.clone(), at("2024-03-03T10:00:00Z")))
            .unwrap();
        log.contacts_mut().delete_contact(&contact_id);
    }

    let conn = open_db(&path).unwrap();
    let log = FieldLog::load(
        SqliteBlobStore::new(&conn),
        shared_clock(),
        SessionOptions::default(),
    );
    assert_eq!(log.calls().calls().len(), 1);
    assert_eq!(log.calls().visits().len(), 3);
    assert!(log.calls().get_call(&call_id).unwrap().is_return_visit);
    assert_eq!(log.records().len(), 1);
    assert!(log.contacts().get_contact(&contact_id).is_none());
    assert_eq!(log.contacts().deleted_contacts().len(), 1);
    assert_eq!(log.contacts().conversations().len(), 1);

    let report = log.current_month_report(&EnglishCatalog);
    assert_eq!(report.month, 2);
    assert_eq!(report.year, 2024);
    assert_eq!(report.hours, 2);
    assert_eq!(report.return_visits, 2);
    assert_eq!(report.share.title, "March, 2024 Service Report");
}

#[test]
fn annual_report_sums_the_year() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open_db(dir.path().join("fieldlog.db")).unwrap();
    let mut log = FieldLog::load(
        SqliteBlobStore::new(&conn),
        shared_clock(),
        SessionOptions::default(),
    );

    let entry = |date: &str, hours, minutes| {
        ServiceRecord::from_hours_minutes(at(date), hours, minutes).unwrap()
    };
    let mut january = entry("2024-01-05T09:00:00Z", 1, 45);
    january.placements = 1;
    let mut june = entry("2024-06-05T09:00:00Z", 0, 15);
    june.video_placements = 2;
    let last_year = entry("2023-06-05T09:00:00Z", 9, 0);
    for record in [january, june, last_year] {
        log.records_mut().upsert(record).unwrap();
    }

    let annual = log.annual_report(Some(2024), &EnglishCatalog);
    assert_eq!(annual.months[0].hours, 1);
    assert_eq!(annual.months[5].hours, 0);
    assert_eq!(annual.totals.hours, 2);
    assert_eq!(annual.totals.placements, 1);
    assert_eq!(annual.totals.video_placements, 2);
    // Placements feed return visits under the default policy.
    assert_eq!(annual.totals.return_visits, 1);
}

#[test]
fn remove_everything_clears_every_collection() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fieldlog.db");
    let conn = open_db(&path).unwrap();
    let mut log = FieldLog::load(
        SqliteBlobStore::new(&conn),
        shared_clock(),
        SessionOptions::default(),
    );
    let call_id = EntityId::from("c1");
    log.calls_mut()
        .save_call(Call::with_id(call_id.clone(), "Birch Lane"))
        .unwrap();
    log.calls_mut()
        .save_visit(Visit::new(call_id, at("2024-03-02T10:00:00Z")))
        .unwrap();
    log.records_mut()
        .upsert(ServiceRecord::new(at("2024-03-02T09:00:00Z"), 1_000))
        .unwrap();
    log.contacts_mut()
        .save_contact(Contact::new("Dana"))
        .unwrap();

    log.remove_everything();

    let reloaded = FieldLog::load(
        SqliteBlobStore::new(&conn),
        shared_clock(),
        SessionOptions::default(),
    );
    assert!(reloaded.calls().calls().is_empty());
    assert!(reloaded.calls().visits().is_empty());
    assert!(reloaded.records().is_empty());
    assert!(reloaded.contacts().contacts().is_empty());
}
