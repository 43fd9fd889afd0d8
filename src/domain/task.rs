use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// List a task lands on when it is created
pub const TODO_LIST: &str = "todo";

/// An outstanding task for a user (not scoring relevant)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub timestamp: DateTime<Utc>,

    /// Globally unique id
    pub uid: String,

    /// Sequential number, starting at 1
    pub id: u64,

    pub title: String,

    /// Owner user id
    pub user: String,

    /// Board list the task is on
    pub list: String,
}

impl Task {
    /// Create a new task on the todo list
    pub fn new(id: u64, title: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            uid: Uuid::new_v4().to_string(),
            id,
            title: title.into(),
            user: user.into(),
            list: TODO_LIST.to_string(),
        }
    }
}
