//! Store configuration and on-disk layout.
//!
//! # Responsibility
//! - Resolve the fixed directory layout under one root directory.
//! - Carry the seed document loaded once at startup.
//!
//! # Invariants
//! - Layout paths are derived from `root` only; nothing is configurable per
//!   directory.
//! - `ensure_dirs` is idempotent.

use crate::db::{DbError, DbResult};
use crate::seed::{SeedData, SeedError};
use std::path::{Path, PathBuf};

const DATA_DIR: &str = "data";
const DATABASE_FILE_NAME: &str = "database.db";
const ATTACHMENTS_DIR: &str = "attachments";
const BACKUPS_DIR: &str = "backups";
const REPORTS_DIR: &str = "reports";
const TEMP_DIR: &str = "temp";

/// Resolved directory layout of a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreLayout {
    root: PathBuf,
}

impl StoreLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root.join(DATA_DIR)
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir().join(DATABASE_FILE_NAME)
    }

    pub fn attachments_dir(&self) -> PathBuf {
        self.data_dir().join(ATTACHMENTS_DIR)
    }

    pub fn backups_dir(&self) -> PathBuf {
        self.root.join(BACKUPS_DIR)
    }

    pub fn reports_dir(&self) -> PathBuf {
        self.root.join(REPORTS_DIR)
    }

    pub fn temp_dir(&self) -> PathBuf {
        self.root.join(TEMP_DIR)
    }

    /// Creates every layout directory that does not exist yet.
    pub fn ensure_dirs(&self) -> DbResult<()> {
        for dir in [
            self.data_dir(),
            self.attachments_dir(),
            self.backups_dir(),
            self.reports_dir(),
            self.temp_dir(),
        ] {
            std::fs::create_dir_all(&dir).map_err(|source| DbError::Io {
                path: dir.display().to_string(),
                source,
            })?;
        }
        Ok(())
    }
}

/// Everything a store needs at construction.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub layout: StoreLayout,
    pub seed: SeedData,
}

impl StoreConfig {
    /// Layout under `root` with the built-in seed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, SeedError> {
        Ok(Self {
            layout: StoreLayout::new(root),
            seed: SeedData::builtin()?,
        })
    }

    pub fn with_seed(mut self, seed: SeedData) -> Self {
        self.seed = seed;
        self
    }

    /// Replaces the seed with one loaded from a JSON file.
    pub fn with_seed_file(self, path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let seed = SeedData::from_path(path)?;
        Ok(self.with_seed(seed))
    }
}

#[cfg(test)]
mod tests {
    use super::StoreLayout;

    #[test]
    fn layout_paths_hang_off_root() {
        let layout = StoreLayout::new("/srv/correspondence");
        assert_eq!(
            layout.database_path(),
            std::path::Path::new("/srv/correspondence/data/database.db")
        );
        assert_eq!(
            layout.attachments_dir(),
            std::path::Path::new("/srv/correspondence/data/attachments")
        );
        assert_eq!(
            layout.backups_dir(),
            std::path::Path::new("/srv/correspondence/backups")
        );
    }

    #[test]
    fn ensure_dirs_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let layout = StoreLayout::new(dir.path());
        layout.ensure_dirs().unwrap();
        layout.ensure_dirs().unwrap();
        assert!(layout.attachments_dir().is_dir());
        assert!(layout.temp_dir().is_dir());
    }
}
