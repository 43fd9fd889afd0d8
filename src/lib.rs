//! Beltboard - belt scorecards for contributor gamification
//!
//! Users earn points in named pools (`github.pulls`, `trello.cards`, ...).
//! Totals map onto an ordered table of belts, and the board projects them
//! into leaderboard and scorecard charts. At year end the standings are
//! archived as `level|total` and everyone starts over at the base belt.
//!
//! ## Layout
//!
//! - [`config`]: TOML options (threshold table, event log ceiling)
//! - [`domain`]: the persisted records
//! - [`store`]: the document and where it is kept
//! - [`scoring`]: the [`Scoreboard`] and the components behind it

pub mod config;
pub mod domain;
pub mod error;
pub mod scoring;
pub mod store;

pub use config::Config;
pub use domain::*;
pub use error::{BoardError, Result, ThresholdError};
pub use scoring::{Chart, LevelTable, LinkParams, Scoreboard};
pub use store::{DocumentStore, JsonFileStore, StoreError, StoreState};
