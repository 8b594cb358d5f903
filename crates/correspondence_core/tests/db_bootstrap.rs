use correspondence_core::db::migrations::{table_has_column, TABLES};
use correspondence_core::{CorrespondenceStore, ReferenceKind, SeedData, StoreConfig};
use rusqlite::Connection;
use std::path::Path;

#[test]
fn open_creates_layout_schema_and_seed() {
    let dir = tempfile::tempdir().unwrap();
    let store = CorrespondenceStore::open(StoreConfig::new(dir.path()).unwrap()).unwrap();

    let layout = store.layout();
    for path in [
        layout.data_dir(),
        layout.attachments_dir(),
        layout.backups_dir(),
        layout.reports_dir(),
        layout.temp_dir(),
    ] {
        assert!(path.is_dir(), "missing directory {}", path.display());
    }
    assert_eq!(store.database_path(), dir.path().join("data").join("database.db"));

    let conn = Connection::open(store.database_path()).unwrap();
    for table in TABLES {
        assert_table_exists(&conn, table);
    }
    for column in ["email", "phone", "fax_count", "email_count"] {
        assert!(table_has_column(&conn, "employees", column).unwrap());
    }

    assert_eq!(count(&conn, "incoming_sources"), 5);
    assert_eq!(count(&conn, "outgoing_destinations"), 5);
    assert_eq!(count(&conn, "incoming_types"), 5);
    assert_eq!(count(&conn, "specializations"), 5);
    assert_eq!(count(&conn, "employees"), 5);
    assert_eq!(count(&conn, "system_settings"), 4);
    assert_eq!(store.setting("system_language").as_deref(), Some("ar"));
    assert!(store.setting_flag("backup_auto"));
}

#[test]
fn reopening_does_not_duplicate_seed_rows() {
    let dir = tempfile::tempdir().unwrap();
    CorrespondenceStore::open(StoreConfig::new(dir.path()).unwrap()).unwrap();
    let store = CorrespondenceStore::open(StoreConfig::new(dir.path()).unwrap()).unwrap();
    CorrespondenceStore::open(StoreConfig::new(dir.path()).unwrap()).unwrap();

    let conn = Connection::open(store.database_path()).unwrap();
    for table in [
        "incoming_sources",
        "outgoing_destinations",
        "incoming_types",
        "specializations",
        "employees",
        "system_settings",
    ] {
        assert_eq!(count(&conn, table), if table == "system_settings" { 4 } else { 5 });
    }
}

#[test]
fn reopening_keeps_user_edits_to_seeded_rows() {
    let dir = tempfile::tempdir().unwrap();
    let store = CorrespondenceStore::open(StoreConfig::new(dir.path()).unwrap()).unwrap();

    assert!(store.set_setting("company_name", "Acme"));
    {
        let conn = Connection::open(store.database_path()).unwrap();
        conn.execute(
            "UPDATE employees SET email = 'changed@example.org' WHERE id = 1",
            [],
        )
        .unwrap();
    }

    let store = CorrespondenceStore::open(StoreConfig::new(dir.path()).unwrap()).unwrap();
    assert_eq!(store.setting("company_name").as_deref(), Some("Acme"));
    let employee = store.employee(1).unwrap();
    assert_eq!(employee.email.as_deref(), Some("changed@example.org"));
}

#[test]
fn legacy_employees_table_gains_optional_columns() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("data").join("database.db");
    std::fs::create_dir_all(db_path.parent().unwrap()).unwrap();
    create_legacy_employees(&db_path);

    let store = CorrespondenceStore::open(StoreConfig::new(dir.path()).unwrap()).unwrap();

    let conn = Connection::open(store.database_path()).unwrap();
    for column in ["email", "phone", "fax_count", "email_count"] {
        assert!(table_has_column(&conn, "employees", column).unwrap());
    }
    let (name, fax_count): (String, i64) = conn
        .query_row(
            "SELECT name, fax_count FROM employees WHERE id = 42",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(name, "Legacy Clerk");
    assert_eq!(fax_count, 0);
}

#[test]
fn existing_optional_columns_keep_their_values() {
    let dir = tempfile::tempdir().unwrap();
    let store = CorrespondenceStore::open(StoreConfig::new(dir.path()).unwrap()).unwrap();
    {
        let conn = Connection::open(store.database_path()).unwrap();
        conn.execute(
            "UPDATE employees SET fax_count = 17, email_count = 3, phone = '555' WHERE id = 2",
            [],
        )
        .unwrap();
    }

    let store = CorrespondenceStore::open(StoreConfig::new(dir.path()).unwrap()).unwrap();
    let employee = store.employee(2).unwrap();
    assert_eq!(employee.fax_count, 17);
    assert_eq!(employee.email_count, 3);
    assert_eq!(employee.phone.as_deref(), Some("555"));
}

#[test]
fn custom_seed_replaces_builtin_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let seed = SeedData::from_json(
        r#"{
            "incoming_types": [{ "name": "email" }],
            "settings": [{ "key": "backup_auto", "value": "0" }]
        }"#,
    )
    .unwrap();
    let config = StoreConfig::new(dir.path()).unwrap().with_seed(seed);
    let store = CorrespondenceStore::open(config).unwrap();

    let types = store.references(ReferenceKind::IncomingType).unwrap();
    assert_eq!(types.len(), 1);
    assert_eq!(types[0].name, "email");
    assert!(store.references(ReferenceKind::IncomingSource).unwrap().is_empty());
    assert!(store.employees(false).unwrap().is_empty());
    assert!(!store.setting_flag("backup_auto"));
}

#[test]
fn empty_seed_leaves_tables_empty() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::new(dir.path())
        .unwrap()
        .with_seed(SeedData::empty());
    let store = CorrespondenceStore::open(config).unwrap();

    assert!(store.settings().unwrap().is_empty());
    assert_eq!(store.setting("company_name"), None);
}

fn create_legacy_employees(path: &Path) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(
        "CREATE TABLE employees (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            department TEXT,
            position TEXT,
            is_active BOOLEAN DEFAULT 1,
            created_date DATETIME DEFAULT CURRENT_TIMESTAMP
        );
        INSERT INTO employees (id, name) VALUES (42, 'Legacy Clerk');",
    )
    .unwrap();
}

fn count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
        row.get(0)
    })
    .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "expected table `{table_name}` to exist");
}
