//! Per-user scorecard views and the all-users table

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::error::{BoardError, Result};

use super::chart::Chart;
use super::leaderboard::LeaderboardProjector;

/// Label of the placeholder breakdown entry
pub const NO_POINTS_LABEL: &str = "No Points";

/// Earned points versus points still needed for the next level
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextLevelProgress {
    pub registered: bool,
    pub earned: i64,
    pub remaining_to_next: i64,
}

impl NextLevelProgress {
    /// Two-entry chart: "Earned" and "To Next Level"
    pub fn to_chart(&self) -> Chart {
        let mut chart = Chart::new();
        chart.push_label("Earned");
        chart.push_label("To Next Level");
        chart.push_value(self.earned);
        chart.push_value(self.remaining_to_next);
        chart
    }
}

/// Points per pool category plus the grand total, with the user's properties
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScorecardSummary {
    pub user_id: String,
    pub total: i64,
    pub pools: BTreeMap<String, i64>,
    pub attributes: BTreeMap<String, String>,
}

/// Raw per-pool points with the user's properties
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserScorecard {
    pub user_id: String,
    pub pools: BTreeMap<String, i64>,
    pub attributes: BTreeMap<String, String>,
}

/// Column of the scorecards table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub title: String,
    pub data: String,
}

impl Column {
    fn new(title: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            data: data.into(),
        }
    }
}

/// One user's row in the scorecards table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScorecardRow {
    pub id: String,
    pub name: String,
    pub total: i64,
    pub level: String,
    pub points_to_next_level: i64,
    /// Points by pool, keyed with dots replaced by spaces
    pub pools: BTreeMap<String, i64>,
}

/// Every registered user's scorecard, with one column per pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScorecardTable {
    pub columns: Vec<Column>,
    pub data: Vec<ScorecardRow>,
}

impl LeaderboardProjector<'_> {
    /// Progress towards the next level.
    ///
    /// Unregistered users get zero earned and the base level's lower bound as
    /// the remaining target.
    pub fn next_level_progress(&self, user_id: &str) -> NextLevelProgress {
        let Some(user) = self.state.users.get(user_id) else {
            return NextLevelProgress {
                registered: false,
                earned: 0,
                remaining_to_next: self.levels.base().min_points,
            };
        };

        let earned = self.state.total_for(user_id);
        let remaining_to_next = self
            .levels
            .points_to_next_level(self.level_of(user), earned)
            .unwrap_or(0);

        NextLevelProgress {
            registered: true,
            earned,
            remaining_to_next,
        }
    }

    /// Points per pool as a chart, or a single "No Points" entry
    pub fn breakdown(&self, user_id: &str) -> Result<Chart> {
        if !self.state.is_registered(user_id) {
            return Err(BoardError::UserNotFound(user_id.to_string()));
        }

        let mut chart = Chart::new();
        match self.state.scorecards.get(user_id) {
            Some(card) if !card.is_empty() => {
                for (pool, points) in card.iter() {
                    chart.push_label(pool);
                    chart.push_value(points);
                }
            }
            _ => {
                chart.push_label(NO_POINTS_LABEL);
                chart.push_value(0);
            }
        }
        Ok(chart)
    }

    /// Totals consolidated by pool category, plus the grand total
    pub fn summary(&self, user_id: &str) -> Result<ScorecardSummary> {
        let user = self
            .state
            .users
            .get(user_id)
            .ok_or_else(|| BoardError::UserNotFound(user_id.to_string()))?;
        let card = self.state.scorecards.get(user_id);

        Ok(ScorecardSummary {
            user_id: user_id.to_string(),
            total: card.map_or(0, |c| c.total()),
            pools: card.map(|c| c.by_category()).unwrap_or_default(),
            attributes: user.properties(),
        })
    }

    /// Raw scorecard merged with the user's properties
    pub fn scorecard(&self, user_id: &str) -> Result<UserScorecard> {
        let user = self
            .state
            .users
            .get(user_id)
            .ok_or_else(|| BoardError::UserNotFound(user_id.to_string()))?;

        let pools = self
            .state
            .scorecards
            .get(user_id)
            .map(|card| {
                card.iter()
                    .map(|(pool, points)| (pool.to_string(), points))
                    .collect()
            })
            .unwrap_or_default();

        Ok(UserScorecard {
            user_id: user_id.to_string(),
            pools,
            attributes: user.properties(),
        })
    }

    /// Table of all registered users with zero-filled pool columns.
    ///
    /// Pool values sit under each row's `pools` object; pool columns point at
    /// them as `pools.<name>`.
    pub fn scorecards_table(&self) -> ScorecardTable {
        let base = &self.levels.base().name;
        let mut fields = BTreeSet::new();
        let mut data = Vec::with_capacity(self.state.users.len());

        for (id, user) in &self.state.users {
            let card = self.state.scorecards.get(id);
            let total = card.map_or(0, |c| c.total());

            let mut pools = BTreeMap::new();
            for (pool, points) in card.into_iter().flat_map(|c| c.iter()) {
                let field = pool.replace('.', " ");
                fields.insert(field.clone());
                pools.insert(field, points);
            }

            let level = match card {
                Some(_) => self.level_of(user).to_string(),
                None => base.clone(),
            };

            let points_to_next_level = match self.levels.points_to_next_level(&level, total) {
                Some(points) => points,
                None => {
                    tracing::error!("Invalid level for user {} : {}", id, level);
                    0
                }
            };

            data.push(ScorecardRow {
                id: id.clone(),
                name: user.label(id).to_string(),
                total,
                level,
                points_to_next_level,
                pools,
            });
        }

        for row in &mut data {
            for field in &fields {
                row.pools.entry(field.clone()).or_insert(0);
            }
        }

        let mut columns = vec![
            Column::new("Name", "name"),
            Column::new("Total", "total"),
            Column::new("Belt", "level"),
            Column::new("Points to next level", "pointsToNextLevel"),
        ];
        columns.extend(
            fields
                .iter()
                .map(|field| Column::new(field.clone(), format!("pools.{}", field))),
        );

        ScorecardTable { columns, data }
    }
}
