//! Leaderboard projection
//!
//! Read-only views over a [`StoreState`] snapshot. Nothing here mutates the
//! store; every view returns owned data.

use crate::domain::User;
use crate::store::StoreState;

use super::chart::{belt_color, Chart, ZERO_COLOR};
use super::levels::LevelTable;

/// Placeholder geo for users without one
const UNKNOWN_GEO: &str = "Unknown";

/// Sort by total descending, ties broken by ascending user id
pub fn rank_by_total<K: Ord>(rows: &mut [(K, i64)]) {
    rows.sort_by(|(a_id, a_total), (b_id, b_total)| {
        b_total.cmp(a_total).then_with(|| a_id.cmp(b_id))
    });
}

/// Aggregates ledger state, the user directory and levels into views
pub struct LeaderboardProjector<'a> {
    pub(super) state: &'a StoreState,
    pub(super) levels: &'a LevelTable,
}

impl<'a> LeaderboardProjector<'a> {
    pub fn new(state: &'a StoreState, levels: &'a LevelTable) -> Self {
        Self { state, levels }
    }

    /// Every registered user with their total, ranked
    pub fn ranked_totals(&self) -> Vec<(&'a str, i64)> {
        let mut totals: Vec<(&str, i64)> = self
            .state
            .users
            .keys()
            .map(|id| (id.as_str(), self.state.total_for(id)))
            .collect();
        rank_by_total(&mut totals);
        totals
    }

    /// Level name of a user, base level when unset
    pub(super) fn level_of(&self, user: &'a User) -> &'a str {
        user.level_or(&self.levels.base().name)
    }

    /// The leaderboard chart.
    ///
    /// Without `max`, users at the base level are left out. With `max`, they
    /// are included and at most `max` rows are emitted.
    pub fn leaderboard(&self, max: Option<usize>) -> Chart {
        let mut chart = Chart::new();
        let mut count = 0;

        for (id, total) in self.ranked_totals() {
            if max.is_some_and(|max| count >= max) {
                break;
            }

            let Some(user) = self.state.users.get(id) else {
                continue;
            };
            let level = self.level_of(user);
            if max.is_none() && self.levels.is_base(level) {
                continue;
            }

            chart.push_label(user.label(id));
            chart.metadata.push(format!(
                "{}|{}|{}",
                id,
                level.to_lowercase(),
                user.geo.as_deref().unwrap_or(UNKNOWN_GEO)
            ));
            chart.history_badges.push(self.history_badges(id));

            let color = belt_color(level).unwrap_or_else(|| {
                tracing::warn!(
                    "Color [{}] does not exist in our color mapping for charts - user = {}",
                    level.to_uppercase(),
                    id
                );
                ZERO_COLOR
            });
            chart.push_colored(total, color);

            count += 1;
        }

        chart
    }

    /// `"year|level|total"` for every archived year the user took part in,
    /// oldest year first
    pub fn history_badges(&self, user: &str) -> String {
        self.state
            .scorecard_history
            .iter()
            .filter_map(|(year, standings)| {
                standings
                    .get(user)
                    .map(|s| format!("{}|{}|{}", year, s.level, s.total))
            })
            .collect::<Vec<_>>()
            .join(",")
    }
}
