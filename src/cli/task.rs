//! Task command implementation

use anyhow::Result;
use std::path::Path;

use super::{open_board, print_json};

/// Add a task for a user, or list tasks when no title is given
pub async fn task_command(
    data: Option<&Path>,
    config: Option<&Path>,
    title: Option<&str>,
    user: Option<&str>,
) -> Result<()> {
    let (_, board) = open_board(data, config);

    match (title, user) {
        (Some(title), Some(user)) => {
            let task = board.add_task(title, user)?;
            board.persist()?;
            print_json(&task)
        }
        (Some(_), None) => anyhow::bail!("--user is required when adding a task"),
        (None, _) => {
            let tasks: Vec<_> = board
                .tasks()
                .into_iter()
                .filter(|t| user.is_none_or(|u| t.user == u))
                .collect();
            print_json(&tasks)
        }
    }
}
