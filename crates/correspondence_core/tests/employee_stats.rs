use chrono::NaiveDate;
use correspondence_core::{
    CorrespondenceStore, DateRange, EmployeeStats, IncomingRecordInput, NewEmployee,
    OutgoingRecordInput, ReferenceKind, StoreConfig,
};
use rusqlite::Connection;
use tempfile::TempDir;

#[test]
fn counts_outgoing_as_fax_and_email_typed_incoming_as_email() {
    let (_dir, store) = open_store();
    let employee_id = store.add_employee(&NewEmployee::new("Nadia")).unwrap();
    let email_type = store
        .add_reference(ReferenceKind::IncomingType, "email", None)
        .unwrap();
    let letter_type = store
        .add_reference(ReferenceKind::IncomingType, "letter", None)
        .unwrap();

    for n in 1..=3 {
        add_outgoing(&store, &format!("OUT-{n}"), employee_id, date(2024, 1, n));
    }
    add_incoming(&store, "IN-1", employee_id, Some(email_type), date(2024, 1, 5));
    add_incoming(&store, "IN-2", employee_id, Some(letter_type), date(2024, 1, 6));
    add_incoming(&store, "IN-3", employee_id, None, date(2024, 1, 7));

    let stats = store.get_employee_stats(employee_id, None);
    assert_eq!(stats, EmployeeStats::new(3, 1));
    assert_eq!(stats.total, 4);
}

#[test]
fn email_keywords_are_matched_case_sensitively_as_substrings() {
    let (_dir, store) = open_store();
    let employee_id = store.add_employee(&NewEmployee::new("Omar")).unwrap();

    let matching = [
        store
            .add_reference(ReferenceKind::IncomingType, "internal email", None)
            .unwrap(),
        store
            .add_reference(ReferenceKind::IncomingType, "إيميل رسمي", None)
            .unwrap(),
    ];
    let not_matching = [
        store
            .add_reference(ReferenceKind::IncomingType, "Email", None)
            .unwrap(),
        store
            .find_reference(ReferenceKind::IncomingType, "بريد إلكتروني")
            .unwrap()
            .id,
    ];

    for (n, type_id) in matching.iter().chain(not_matching.iter()).enumerate() {
        add_incoming(
            &store,
            &format!("IN-{n}"),
            employee_id,
            Some(*type_id),
            date(2024, 2, 1),
        );
    }

    assert_eq!(store.get_employee_stats(employee_id, None).email_count, 2);
}

#[test]
fn date_range_is_inclusive_on_both_ends() {
    let (_dir, store) = open_store();
    let employee_id = store.add_employee(&NewEmployee::new("Layla")).unwrap();

    add_outgoing(&store, "OUT-A", employee_id, date(2024, 2, 28));
    add_outgoing(&store, "OUT-B", employee_id, date(2024, 3, 1));
    add_outgoing(&store, "OUT-C", employee_id, date(2024, 3, 15));
    add_outgoing(&store, "OUT-D", employee_id, date(2024, 3, 31));
    add_outgoing(&store, "OUT-E", employee_id, date(2024, 4, 1));

    let march = DateRange::new(date(2024, 3, 1), date(2024, 3, 31)).unwrap();
    assert_eq!(store.get_employee_stats(employee_id, Some(march)).fax_count, 3);

    let single_day = DateRange::new(date(2024, 3, 15), date(2024, 3, 15)).unwrap();
    assert_eq!(
        store.get_employee_stats(employee_id, Some(single_day)).fax_count,
        1
    );
    assert_eq!(store.get_employee_stats(employee_id, None).fax_count, 5);
}

#[test]
fn half_open_bounds_mean_no_filter() {
    assert!(DateRange::from_bounds(Some(date(2024, 1, 1)), None).is_none());
    assert!(DateRange::from_bounds(None, Some(date(2024, 1, 1))).is_none());
    assert!(DateRange::new(date(2024, 2, 1), date(2024, 1, 1)).is_err());
}

#[test]
fn unknown_employee_has_zero_stats() {
    let (_dir, store) = open_store();
    assert_eq!(store.get_employee_stats(9_999, None), EmployeeStats::zero());
}

#[test]
fn stats_failure_returns_zero() {
    let (_dir, store) = open_store();
    let employee_id = store.add_employee(&NewEmployee::new("Karim")).unwrap();
    add_outgoing(&store, "OUT-1", employee_id, date(2024, 1, 1));

    raw_conn(&store)
        .execute_batch("DROP TABLE outgoing_records;")
        .unwrap();

    assert_eq!(
        store.get_employee_stats(employee_id, None),
        EmployeeStats::zero()
    );
}

#[test]
fn update_employee_counts_writes_cached_counters() {
    let (_dir, store) = open_store();
    let employee_id = store.add_employee(&NewEmployee::new("Huda")).unwrap();
    let email_type = store
        .add_reference(ReferenceKind::IncomingType, "email", None)
        .unwrap();
    add_outgoing(&store, "OUT-1", employee_id, date(2024, 5, 1));
    add_outgoing(&store, "OUT-2", employee_id, date(2024, 5, 2));
    add_incoming(&store, "IN-1", employee_id, Some(email_type), date(2024, 5, 3));

    assert!(store.update_employee_counts(employee_id));

    let employee = store.employee(employee_id).unwrap();
    assert_eq!(employee.fax_count, 2);
    assert_eq!(employee.email_count, 1);
}

#[test]
fn update_employee_counts_succeeds_without_counter_columns() {
    let (_dir, store) = open_store();
    let employee_id = store.add_employee(&NewEmployee::new("Samir")).unwrap();
    add_outgoing(&store, "OUT-1", employee_id, date(2024, 5, 1));

    raw_conn(&store)
        .execute_batch(
            "ALTER TABLE employees DROP COLUMN fax_count;
             ALTER TABLE employees DROP COLUMN email_count;",
        )
        .unwrap();

    assert!(store.update_employee_counts(employee_id));
    let employee = store.employee(employee_id).unwrap();
    assert_eq!(employee.fax_count, 0);
    assert_eq!(employee.email_count, 0);
}

#[test]
fn refresh_all_and_activity_report_cover_every_employee() {
    let (_dir, store) = open_store();
    add_outgoing(&store, "OUT-1", 1, date(2024, 6, 1));
    add_outgoing(&store, "OUT-2", 1, date(2024, 6, 2));
    add_outgoing(&store, "OUT-3", 3, date(2024, 6, 3));

    assert!(store.refresh_all_employee_counts());
    assert_eq!(store.employee(1).unwrap().fax_count, 2);
    assert_eq!(store.employee(3).unwrap().fax_count, 1);
    assert_eq!(store.employee(2).unwrap().fax_count, 0);

    assert!(store.set_employee_active(2, false));
    let report = store.employee_activity_report(None, true).unwrap();
    assert_eq!(report.len(), 4);
    assert!(report.iter().all(|line| line.employee.id != 2));
    let first = report.iter().find(|line| line.employee.id == 1).unwrap();
    assert_eq!(first.stats.fax_count, 2);

    let june_first = DateRange::new(date(2024, 6, 1), date(2024, 6, 1)).unwrap();
    let report = store
        .employee_activity_report(Some(june_first), false)
        .unwrap();
    assert_eq!(report.len(), 5);
    let total: i64 = report.iter().map(|line| line.stats.total).sum();
    assert_eq!(total, 1);
}

#[test]
fn employee_writes_are_validated() {
    let (_dir, store) = open_store();

    assert!(store.add_employee(&NewEmployee::new("   ")).is_none());

    let mut bad_email = NewEmployee::new("Rana");
    bad_email.email = Some("not-an-address".to_string());
    assert!(store.add_employee(&bad_email).is_none());

    let mut good = NewEmployee::new("Rana");
    good.email = Some("rana@example.org".to_string());
    good.department = Some("Archive".to_string());
    let id = store.add_employee(&good).unwrap();

    good.position = Some("Clerk".to_string());
    assert!(store.update_employee(id, &good));
    let stored = store.employee(id).unwrap();
    assert_eq!(stored.position.as_deref(), Some("Clerk"));
    assert_eq!(stored.email.as_deref(), Some("rana@example.org"));
    assert!(stored.is_active);

    assert!(!store.update_employee(9_999, &good));
    assert!(store.employee(9_999).is_none());
}

fn open_store() -> (TempDir, CorrespondenceStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = CorrespondenceStore::open(StoreConfig::new(dir.path()).unwrap()).unwrap();
    (dir, store)
}

fn raw_conn(store: &CorrespondenceStore) -> Connection {
    Connection::open(store.database_path()).unwrap()
}

fn add_outgoing(store: &CorrespondenceStore, number: &str, employee_id: i64, day: NaiveDate) {
    let input = OutgoingRecordInput {
        record_number: number.to_string(),
        outgoing_number: format!("{number}-o"),
        serial_number: format!("{number}-s"),
        title: format!("Outgoing {number}"),
        employee_id: Some(employee_id),
        registration_date: Some(day),
        ..Default::default()
    };
    store.add_outgoing(&input).unwrap();
}

fn add_incoming(
    store: &CorrespondenceStore,
    number: &str,
    employee_id: i64,
    type_id: Option<i64>,
    day: NaiveDate,
) {
    let input = IncomingRecordInput {
        record_number: number.to_string(),
        incoming_number: format!("{number}-i"),
        serial_number: format!("{number}-s"),
        title: format!("Incoming {number}"),
        type_id,
        employee_id: Some(employee_id),
        registration_date: Some(day),
        ..Default::default()
    };
    store.add_incoming(&input).unwrap();
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}
