//! Error types for scorecard operations

use thiserror::Error;

use crate::store::StoreError;

/// Errors surfaced by [`crate::Scoreboard`] operations
#[derive(Debug, Error)]
pub enum BoardError {
    /// Missing keys or malformed input on a mutating call
    #[error("Invalid input: {0}")]
    Validation(String),

    /// The operation targets a user that is not registered
    #[error("User '{0}' is not registered")]
    UserNotFound(String),

    /// Registration of an id that is already taken
    #[error("User '{0}' is already registered")]
    UserExists(String),

    /// Year-end archive for a year that already has history
    #[error("History for year '{0}' already exists")]
    YearExists(String),

    /// Malformed level threshold table
    #[error("Invalid level thresholds: {0}")]
    Thresholds(#[from] ThresholdError),

    /// Durable load/save failure
    #[error("Persistence failed: {0}")]
    Persistence(#[from] StoreError),
}

impl BoardError {
    /// True for errors that mean "this user does not exist"
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UserNotFound(_))
    }

    /// True for conflicts with existing state (taken user id, archived year)
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::UserExists(_) | Self::YearExists(_))
    }
}

/// Reasons a `minPoints:LEVEL` threshold string cannot be used
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ThresholdError {
    #[error("no usable `minPoints:LEVEL` pairs")]
    Empty,

    #[error("minimum points '{0}' is not an integer")]
    InvalidPoints(String),

    #[error("level name '{0}' is empty or contains one of '|', ',' or ':'")]
    InvalidName(String),

    #[error("thresholds must be strictly ascending ({previous} then {next})")]
    NotAscending { previous: i64, next: i64 },
}

pub type Result<T> = std::result::Result<T, BoardError>;
