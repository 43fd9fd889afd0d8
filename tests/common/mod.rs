//! Shared test utilities for scoreboard integration tests

use std::collections::BTreeMap;
use std::path::PathBuf;
use tempfile::TempDir;

use beltboard::{Config, JsonFileStore, Scoreboard};

/// Temp directory holding the scoring document; removed with the test
pub struct TestStore {
    pub dir: TempDir,
}

impl TestStore {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.path().join("database.json")
    }

    /// Open a board on the document with the given config
    pub fn open(&self, config: &Config) -> Scoreboard {
        Scoreboard::open(config, Box::new(JsonFileStore::new(self.path())))
    }
}

/// Register users whose display name is the id with a capital first letter
pub fn register_all(board: &Scoreboard, ids: &[&str]) {
    for id in ids {
        let mut name = id.to_string();
        if let Some(first) = name.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        board
            .register_user(id, Some(name), None, BTreeMap::new())
            .expect("Failed to register user");
    }
}
