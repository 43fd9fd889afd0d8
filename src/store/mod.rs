//! Shared in-memory store and its durable persistence
//!
//! [`StoreState`] is the whole document: users, scorecards, the event log,
//! tasks and archived history. It is owned by [`crate::Scoreboard`]; the
//! [`DocumentStore`] trait is the seam to whatever keeps it on disk.

mod io;

pub use io::{DocumentStore, JsonFileStore, StoreError};

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Event, Scorecard, Task, User, YearStandings};

/// The complete scoring document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreState {
    /// When this document was first created
    #[serde(default = "Utc::now")]
    pub created: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Registered users by id
    #[serde(default)]
    pub users: BTreeMap<String, User>,

    /// Points per pool by user id
    #[serde(default)]
    pub scorecards: BTreeMap<String, Scorecard>,

    /// Bounded audit log, oldest first
    #[serde(default)]
    pub events: VecDeque<Event>,

    #[serde(default)]
    pub tasks: Vec<Task>,

    /// Last sequential task number handed out
    #[serde(default)]
    pub last_task_num: u64,

    /// Archived standings by year key
    #[serde(default)]
    pub scorecard_history: BTreeMap<String, YearStandings>,

    /// Keys of point awards that were already granted
    #[serde(default)]
    pub points_duplicate_checker: BTreeSet<String>,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            created: Utc::now(),
            version: None,
            users: BTreeMap::new(),
            scorecards: BTreeMap::new(),
            events: VecDeque::new(),
            tasks: Vec::new(),
            last_task_num: 0,
            scorecard_history: BTreeMap::new(),
            points_duplicate_checker: BTreeSet::new(),
        }
    }
}

impl StoreState {
    /// Total points of a user; zero when they have no scorecard
    pub fn total_for(&self, user: &str) -> i64 {
        self.scorecards.get(user).map_or(0, Scorecard::total)
    }

    /// Whether the user is registered
    pub fn is_registered(&self, user: &str) -> bool {
        self.users.contains_key(user)
    }
}
