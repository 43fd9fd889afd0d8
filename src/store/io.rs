//! Document store I/O operations

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use fs2::FileExt;
use thiserror::Error;

use super::StoreState;

/// Durable load/save failures
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed document {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Where the scoring document lives between runs
pub trait DocumentStore: Send + Sync {
    /// Read the document; `Ok(None)` when none has been written yet
    fn load(&self) -> Result<Option<StoreState>, StoreError>;

    /// Write the full document
    fn save(&self, state: &StoreState) -> Result<(), StoreError>;
}

/// Pretty-printed JSON document on the local filesystem
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default location (`~/.beltboard/database.json`)
    pub fn default_path() -> PathBuf {
        crate::config::Config::global_config_dir().join("database.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, path: &Path) -> impl FnOnce(std::io::Error) -> StoreError {
        let path = path.to_path_buf();
        move |source| StoreError::Io { path, source }
    }
}

impl DocumentStore for JsonFileStore {
    fn load(&self) -> Result<Option<StoreState>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).map_err(self.io_err(&self.path))?;
        tracing::info!("Database loading (size={})", content.len());

        let state = serde_json::from_str(&content).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        Ok(Some(state))
    }

    /// Save with an exclusive lock and an atomic rename.
    fn save(&self, state: &StoreState) -> Result<(), StoreError> {
        let started = Instant::now();

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(self.io_err(parent))?;
        }

        let content = serde_json::to_vec_pretty(state).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;

        let lock_path = self.path.with_extension("json.lock");
        let lock_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)
            .map_err(self.io_err(&lock_path))?;
        lock_file.lock_exclusive().map_err(self.io_err(&lock_path))?;

        let temp_path = self.path.with_extension("json.tmp");
        let mut temp_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .map_err(self.io_err(&temp_path))?;
        temp_file
            .write_all(&content)
            .and_then(|_| temp_file.sync_all())
            .map_err(self.io_err(&temp_path))?;

        fs::rename(&temp_path, &self.path).map_err(self.io_err(&self.path))?;

        tracing::info!(
            "Database saved ({}ms, size={})",
            started.elapsed().as_millis(),
            content.len()
        );
        Ok(())
    }
}
