//! Whole-file backup and restore.
//!
//! Copies are byte-for-byte; the source is never checked for being a valid
//! database.

use super::CorrespondenceStore;
use chrono::Local;
use log::{error, info};
use std::path::{Path, PathBuf};

const BACKUP_FILE_PREFIX: &str = "database_backup_";
const BACKUP_FILE_EXTENSION: &str = "db";

impl CorrespondenceStore {
    /// Copies the live database file to `path`.
    pub fn backup(&self, path: impl AsRef<Path>) -> bool {
        copy_file("db_backup", &self.database_path(), path.as_ref())
    }

    /// Copies `path` over the live database file.
    pub fn restore(&self, path: impl AsRef<Path>) -> bool {
        copy_file("db_restore", path.as_ref(), &self.database_path())
    }

    /// Writes a timestamped snapshot into the layout's backups directory.
    pub fn backup_to_dir(&self) -> Option<PathBuf> {
        let file_name = format!(
            "{BACKUP_FILE_PREFIX}{}.{BACKUP_FILE_EXTENSION}",
            Local::now().format("%Y%m%d_%H%M%S")
        );
        let target = self.layout.backups_dir().join(file_name);
        self.backup(&target).then_some(target)
    }

    /// Lists snapshot files in the backups directory, newest name first.
    pub fn list_backups(&self) -> Vec<PathBuf> {
        let dir = self.layout.backups_dir();
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) => {
                error!(
                    "event=db_backup_list module=store status=error path={} error={}",
                    dir.display(),
                    err
                );
                return Vec::new();
            }
        };

        let mut backups: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && path.extension().and_then(|ext| ext.to_str()) == Some(BACKUP_FILE_EXTENSION)
                    && path
                        .file_name()
                        .and_then(|name| name.to_str())
                        .is_some_and(|name| name.starts_with(BACKUP_FILE_PREFIX))
            })
            .collect();
        backups.sort();
        backups.reverse();
        backups
    }
}

fn copy_file(event: &'static str, from: &Path, to: &Path) -> bool {
    // Copying a file onto itself would truncate it before reading.
    if same_file(from, to) {
        info!(
            "event={} module=store status=ok bytes=0 reason=same_file path={}",
            event,
            from.display()
        );
        return true;
    }

    match std::fs::copy(from, to) {
        Ok(bytes) => {
            info!(
                "event={} module=store status=ok bytes={} from={} to={}",
                event,
                bytes,
                from.display(),
                to.display()
            );
            true
        }
        Err(err) => {
            error!(
                "event={} module=store status=error from={} to={} error={}",
                event,
                from.display(),
                to.display(),
                err
            );
            false
        }
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
