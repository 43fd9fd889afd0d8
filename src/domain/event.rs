use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The kind of audit-log event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    /// Points added to (or removed from) a pool
    #[serde(rename = "Points Increment")]
    PointsIncrement,
    /// A user property or scorecard value was edited
    #[serde(rename = "User Update")]
    UserUpdate,
    /// A user was promoted to a higher level
    #[serde(rename = "Level Up")]
    LevelUp,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::PointsIncrement => write!(f, "Points Increment"),
            EventKind::UserUpdate => write!(f, "User Update"),
            EventKind::LevelUp => write!(f, "Level Up"),
        }
    }
}

/// A single entry in the bounded event log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// When this event was recorded
    pub timestamp: DateTime<Utc>,

    /// The kind of event
    #[serde(rename = "type")]
    pub kind: EventKind,

    /// User the event is about
    pub user: String,

    /// Points delta (points events only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<i64>,

    /// Pool the points went to (points events only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool: Option<String>,

    /// Markdown link to the source of the points, empty when unknown
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source: String,

    /// Free text (update events)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Event {
    fn new(kind: EventKind, user: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            kind,
            user: user.into(),
            points: None,
            pool: None,
            source: String::new(),
            text: None,
        }
    }

    /// Create a points increment event
    pub fn points(
        user: impl Into<String>,
        pool: impl Into<String>,
        points: i64,
        source: impl Into<String>,
    ) -> Self {
        let mut event = Self::new(EventKind::PointsIncrement, user);
        event.points = Some(points);
        event.pool = Some(pool.into());
        event.source = source.into();
        event
    }

    /// Create a user update event
    pub fn user_update(user: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(EventKind::UserUpdate, user).with_text(text)
    }

    /// Create a level up event
    pub fn level_up(user: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(EventKind::LevelUp, user).with_text(text)
    }

    fn with_text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        if !text.is_empty() {
            self.text = Some(text);
        }
        self
    }
}
