//! Scoring engine
//!
//! [`Scoreboard`] owns the store under a read/write lock and routes every
//! operation to a stateless component:
//!
//! - [`PointsLedger`] applies increments and bounds the event log
//! - [`LevelEngine`] maps totals to levels
//! - [`LeaderboardProjector`] builds the read-only views
//! - [`YearEndArchiver`] snapshots and resets at the end of a year
//! - [`UserDirectory`] registers and edits users

mod archive;
mod chart;
mod leaderboard;
mod ledger;
mod levels;
mod link;
mod users;
mod views;

pub use archive::YearEndArchiver;
pub use chart::{belt_color, Chart, ColorPair, DataSet, BORDER_WIDTH, PALETTE, ZERO_COLOR};
pub use leaderboard::{rank_by_total, LeaderboardProjector};
pub use ledger::PointsLedger;
pub use levels::{LevelEngine, LevelTable, Threshold};
pub use link::{LinkParams, LinkSource};
pub use users::{claim_once, users_missing_attribute, UserDirectory, NOT_REGISTERED};
pub use views::{
    Column, NextLevelProgress, ScorecardRow, ScorecardSummary, ScorecardTable, UserScorecard,
    NO_POINTS_LABEL,
};

use std::collections::{BTreeMap, VecDeque};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::config::Config;
use crate::domain::{Event, Task, YearStandings};
use crate::error::Result;
use crate::store::{DocumentStore, StoreState};

/// The scoring service: shared state plus the components acting on it
pub struct Scoreboard {
    state: RwLock<StoreState>,
    levels: LevelEngine,
    ledger: PointsLedger,
    store: Option<Box<dyn DocumentStore>>,
}

impl Scoreboard {
    /// In-memory board with an empty store
    pub fn new(config: &Config) -> Self {
        Self::with_state(config, StoreState::default())
    }

    /// In-memory board over an existing document
    pub fn with_state(config: &Config, state: StoreState) -> Self {
        Self {
            state: RwLock::new(state),
            levels: LevelEngine::new(config.thresholds()),
            ledger: PointsLedger::new(config.events_max()),
            store: None,
        }
    }

    /// Board backed by a document store.
    ///
    /// A missing document starts a fresh one and saves it. A document that
    /// fails to load is logged and replaced by an empty in-memory one; it is
    /// not overwritten until the next [`Scoreboard::persist`].
    pub fn open(config: &Config, store: Box<dyn DocumentStore>) -> Self {
        let (state, fresh) = match store.load() {
            Ok(Some(state)) => (state, false),
            Ok(None) => {
                tracing::warn!("Store does not exist, creating a new one");
                (StoreState::default(), true)
            }
            Err(e) => {
                tracing::error!("Failed to load store: {}", e);
                (StoreState::default(), false)
            }
        };

        let mut board = Self::with_state(config, state);
        board.store = Some(store);
        if fresh {
            if let Err(e) = board.persist() {
                tracing::error!("Unable to create store: {}", e);
            }
        }
        board
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Save the current document; a no-op for in-memory boards
    pub fn persist(&self) -> Result<()> {
        let Some(store) = &self.store else {
            return Ok(());
        };
        let state = self.write();
        store.save(&state).map_err(|e| {
            tracing::error!("Error while saving store: {}", e);
            e.into()
        })
    }

    /// Copy of the whole document
    pub fn snapshot(&self) -> StoreState {
        self.read().clone()
    }

    pub fn levels(&self) -> &LevelTable {
        self.levels.table()
    }

    pub fn events_max(&self) -> usize {
        self.ledger.events_max()
    }

    // Points

    /// Add `delta` points to a user's pool; returns the pool's new value
    pub fn increment(&self, user: &str, pool: &str, delta: i64, link: &LinkParams) -> Result<i64> {
        let mut state = self.write();
        self.ledger.increment(&mut state, user, pool, delta, link)
    }

    /// Record an award key, `false` when it was already claimed
    pub fn claim_once(&self, key: &str) -> bool {
        claim_once(&mut self.write(), key)
    }

    // Views

    pub fn leaderboard(&self, max: Option<usize>) -> Chart {
        let state = self.read();
        LeaderboardProjector::new(&state, self.levels.table()).leaderboard(max)
    }

    pub fn next_level_progress(&self, user: &str) -> NextLevelProgress {
        let state = self.read();
        LeaderboardProjector::new(&state, self.levels.table()).next_level_progress(user)
    }

    pub fn breakdown(&self, user: &str) -> Result<Chart> {
        let state = self.read();
        LeaderboardProjector::new(&state, self.levels.table()).breakdown(user)
    }

    pub fn summary(&self, user: &str) -> Result<ScorecardSummary> {
        let state = self.read();
        LeaderboardProjector::new(&state, self.levels.table()).summary(user)
    }

    pub fn scorecard(&self, user: &str) -> Result<UserScorecard> {
        let state = self.read();
        LeaderboardProjector::new(&state, self.levels.table()).scorecard(user)
    }

    pub fn scorecards_table(&self) -> ScorecardTable {
        let state = self.read();
        LeaderboardProjector::new(&state, self.levels.table()).scorecards_table()
    }

    /// The event log, oldest first
    pub fn events(&self) -> VecDeque<Event> {
        self.read().events.clone()
    }

    /// Archived standings by year
    pub fn history(&self) -> BTreeMap<String, YearStandings> {
        self.read().scorecard_history.clone()
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.read().tasks.clone()
    }

    pub fn users_missing_attribute(&self, key: &str) -> BTreeMap<String, String> {
        users_missing_attribute(&self.read(), key)
    }

    // Users

    fn directory(&self) -> UserDirectory<'_> {
        UserDirectory::new(&self.ledger, self.levels.table())
    }

    pub fn register_user(
        &self,
        id: &str,
        display_name: Option<String>,
        geo: Option<String>,
        attributes: BTreeMap<String, String>,
    ) -> Result<()> {
        let mut state = self.write();
        self.directory()
            .register(&mut state, id, display_name, geo, attributes)
    }

    pub fn update_user(&self, id: &str, values: &BTreeMap<String, String>) -> Result<usize> {
        let mut state = self.write();
        self.directory().update(&mut state, id, values)
    }

    pub fn set_scorecard_fields(
        &self,
        id: &str,
        values: &BTreeMap<String, String>,
    ) -> Result<usize> {
        let mut state = self.write();
        self.directory().set_fields(&mut state, id, values)
    }

    /// Promote users whose totals earned a higher level; returns their ids
    pub fn refresh_levels(&self) -> Vec<String> {
        let mut state = self.write();
        self.directory().refresh_levels(&mut state)
    }

    pub fn add_task(&self, title: &str, user: &str) -> Result<Task> {
        let mut state = self.write();
        self.directory().add_task(&mut state, title, user)
    }

    // Year end

    /// Archive the year's standings and reset for a new year.
    ///
    /// Runs under one write lock; concurrent increments wait for it.
    pub fn archive_year(&self, year: &str) -> Result<String> {
        let mut state = self.write();
        YearEndArchiver::new(self.levels.table()).archive(&mut state, year)
    }
}
