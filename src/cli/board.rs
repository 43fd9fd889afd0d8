//! Read-only views: leaderboard, scorecards, events and levels

use anyhow::{Context, Result};
use clap::ValueEnum;
use std::path::Path;

use beltboard::{BoardError, LevelTable};

use super::{open_board, print_json};

/// Which scorecard view to print
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum ScorecardView {
    /// Totals by pool category
    #[default]
    Summary,
    /// Points per pool as a chart
    Breakdown,
    /// Earned versus needed for the next level
    NextLevel,
    /// Raw pools and properties
    Raw,
}

pub async fn leaderboard_command(
    data: Option<&Path>,
    config: Option<&Path>,
    max: Option<usize>,
) -> Result<()> {
    let (_, board) = open_board(data, config);
    print_json(&board.leaderboard(max))
}

pub async fn scorecard_command(
    data: Option<&Path>,
    config: Option<&Path>,
    user: &str,
    view: ScorecardView,
) -> Result<()> {
    let (_, board) = open_board(data, config);
    match view {
        ScorecardView::Summary => print_json(&board.summary(user)?),
        ScorecardView::Breakdown => print_json(&board.breakdown(user)?),
        ScorecardView::NextLevel => print_json(&board.next_level_progress(user).to_chart()),
        ScorecardView::Raw => print_json(&board.scorecard(user)?),
    }
}

pub async fn scorecards_command(data: Option<&Path>, config: Option<&Path>) -> Result<()> {
    let (_, board) = open_board(data, config);
    print_json(&board.scorecards_table())
}

/// Print the event log, optionally only the newest `tail` entries
pub async fn events_command(
    data: Option<&Path>,
    config: Option<&Path>,
    tail: Option<usize>,
) -> Result<()> {
    let (_, board) = open_board(data, config);
    let events = board.events();
    let skip = tail.map_or(0, |n| events.len().saturating_sub(n));
    let events: Vec<_> = events.into_iter().skip(skip).collect();
    print_json(&events)
}

/// Print the level table; `check` fails on a malformed configured table
/// instead of silently falling back, `refresh` promotes eligible users
pub async fn levels_command(
    data: Option<&Path>,
    config: Option<&Path>,
    check: bool,
    refresh: bool,
) -> Result<()> {
    let (config, board) = open_board(data, config);

    if check {
        if let Some(raw) = config.thresholds() {
            LevelTable::parse(raw)
                .map_err(BoardError::from)
                .context("Configured thresholds are not usable")?;
        }
    }

    if refresh {
        let promoted = board.refresh_levels();
        if !promoted.is_empty() {
            board.persist()?;
        }
        for id in &promoted {
            println!("Level up: {}", id);
        }
    }

    print_json(&board.levels().levels())
}
