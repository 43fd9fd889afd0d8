//! Archive command implementation

use anyhow::Result;
use std::path::Path;

use super::{open_board, print_json};

/// Close out a year, or print the archived history when no year is given
pub async fn archive_command(
    data: Option<&Path>,
    config: Option<&Path>,
    year: Option<&str>,
) -> Result<()> {
    let (_, board) = open_board(data, config);

    let Some(year) = year else {
        return print_json(&board.history());
    };

    let year = board.archive_year(year)?;
    board.persist()?;
    println!("Archived {}", year);
    Ok(())
}
