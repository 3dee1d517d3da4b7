//! The project workspace: data directory, configuration and store.
//!
//! Data lives in a single directory, by default `~/.volta`, holding one
//! JSON file per store key, the optional `volta.toml` and the optional
//! literature bootstrap file.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::db::{LiteratureDb, TaskDb};
use crate::error::Result;
use crate::store::{FileStore, KeyValueStore};

/// Environment variable naming the data directory.
pub const DATA_DIR_ENV: &str = "VOLTA_DIR";

/// Pick the data directory: explicit flag, then `$VOLTA_DIR`, then `~/.volta`.
pub fn resolve_data_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".volta")
}

/// An opened project: its configuration and the store behind it.
pub struct Project {
    pub config: Config,
    pub store: Box<dyn KeyValueStore>,
    dir: PathBuf,
}

impl Project {
    /// Open the project rooted at `data_dir`, creating the directory if needed.
    pub fn open(data_dir: &Path, config_path: Option<&Path>) -> Result<Self> {
        fs::create_dir_all(data_dir)?;
        let config = Config::load(config_path, data_dir)?;
        let store = FileStore::open(data_dir)?;
        tracing::debug!(dir = %data_dir.display(), "opened project");
        Ok(Project {
            config,
            store: Box::new(store),
            dir: data_dir.to_path_buf(),
        })
    }

    /// A project over an arbitrary store, rooted at `dir` for the bootstrap file.
    pub fn with_store(config: Config, store: Box<dyn KeyValueStore>, dir: &Path) -> Self {
        Project {
            config,
            store,
            dir: dir.to_path_buf(),
        }
    }

    pub fn bootstrap_path(&self) -> PathBuf {
        self.dir.join(&self.config.bootstrap_file)
    }

    pub fn load_tasks(&mut self) -> Result<TaskDb> {
        TaskDb::load(self.store.as_mut())
    }

    pub fn load_literature(&mut self) -> Result<LiteratureDb> {
        let bootstrap = self.bootstrap_path();
        LiteratureDb::load(self.store.as_mut(), Some(&bootstrap))
    }

    pub fn save_tasks(&mut self, db: &TaskDb) -> Result<()> {
        db.save(self.store.as_mut())
    }

    pub fn save_literature(&mut self, db: &LiteratureDb) -> Result<()> {
        db.save(self.store.as_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_explicit_data_dir_wins() {
        let dir = PathBuf::from("/tmp/volta-explicit");
        assert_eq!(resolve_data_dir(Some(&dir)), dir);
    }

    #[test]
    fn test_open_creates_directory_and_seeds_on_first_use() {
        let root = tempfile::tempdir().unwrap();
        let data_dir = root.path().join("data");
        let mut project = Project::open(&data_dir, None).unwrap();
        assert!(data_dir.is_dir());

        let tasks = project.load_tasks().unwrap();
        assert_eq!(tasks.tasks.len(), 3);
        assert!(data_dir.join("projectVoltaTasks.json").exists());

        let lit = project.load_literature().unwrap();
        assert_eq!(lit.items.len(), 2);
        assert!(data_dir.join("project_volta_literature.json").exists());
    }

    #[test]
    fn test_save_round_trips_through_store() {
        let root = tempfile::tempdir().unwrap();
        let mut project = Project::with_store(Config::default(), Box::new(MemoryStore::default()), root.path());
        let mut tasks = project.load_tasks().unwrap();
        tasks.tasks.truncate(1);
        project.save_tasks(&tasks).unwrap();
        assert_eq!(project.load_tasks().unwrap().tasks.len(), 1);
    }
}
