use correspondence_core::{CorrespondenceStore, NewEmployee, StoreConfig};
use tempfile::TempDir;

#[test]
fn backup_is_byte_identical() {
    let (dir, store) = open_store();
    let target = dir.path().join("copy.db");

    assert!(store.backup(&target));
    assert_eq!(
        std::fs::read(store.database_path()).unwrap(),
        std::fs::read(&target).unwrap()
    );
}

#[test]
fn restore_replaces_the_live_database() {
    let (dir, store) = open_store();
    let snapshot = dir.path().join("before.db");
    assert!(store.backup(&snapshot));

    let added = store.add_employee(&NewEmployee::new("Temporary")).unwrap();
    assert!(store.employee(added).is_some());

    assert!(store.restore(&snapshot));
    assert!(store.employee(added).is_none());
    assert_eq!(store.employees(false).unwrap().len(), 5);
    assert_eq!(
        std::fs::read(store.database_path()).unwrap(),
        std::fs::read(&snapshot).unwrap()
    );
}

#[test]
fn restore_does_not_validate_the_source() {
    let (dir, store) = open_store();
    let junk = dir.path().join("junk.bin");
    std::fs::write(&junk, b"not a database").unwrap();

    assert!(store.restore(&junk));
    assert_eq!(std::fs::read(store.database_path()).unwrap(), b"not a database");
    assert!(store.employees(false).is_none());
}

#[test]
fn io_failures_return_false() {
    let (dir, store) = open_store();

    assert!(!store.restore(dir.path().join("missing.db")));
    assert!(!store.backup(dir.path().join("no_such_dir").join("copy.db")));
    assert!(store.employees(false).is_some());
}

#[test]
fn backup_onto_itself_leaves_file_intact() {
    let (_dir, store) = open_store();
    let before = std::fs::read(store.database_path()).unwrap();

    assert!(store.backup(store.database_path()));
    assert!(store.restore(store.database_path()));
    assert_eq!(std::fs::read(store.database_path()).unwrap(), before);
}

#[test]
fn snapshots_land_in_backups_dir() {
    let (_dir, store) = open_store();

    let snapshot = store.backup_to_dir().unwrap();
    assert_eq!(snapshot.parent().unwrap(), store.layout().backups_dir());
    let name = snapshot.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("database_backup_"));
    assert!(name.ends_with(".db"));

    std::fs::write(store.layout().backups_dir().join("notes.txt"), "x").unwrap();
    assert_eq!(store.list_backups(), vec![snapshot]);
}

fn open_store() -> (TempDir, CorrespondenceStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = CorrespondenceStore::open(StoreConfig::new(dir.path()).unwrap()).unwrap();
    (dir, store)
}
