//! Year-end archive
//!
//! Snapshots every non-empty scorecard as `level|total` under a year key,
//! then wipes tasks and scorecards and resets every user to the base level.
//! Sub-pool detail is not retained.

use crate::domain::{Standing, YearStandings};
use crate::error::{BoardError, Result};
use crate::store::StoreState;

use super::leaderboard::rank_by_total;
use super::levels::LevelTable;

/// Runs the destructive year-end transaction against a locked store
pub struct YearEndArchiver<'a> {
    levels: &'a LevelTable,
}

impl<'a> YearEndArchiver<'a> {
    pub fn new(levels: &'a LevelTable) -> Self {
        Self { levels }
    }

    /// Archive current standings under `year`.
    ///
    /// The store is untouched when the year is blank or already archived.
    pub fn archive(&self, state: &mut StoreState, year: &str) -> Result<String> {
        let year = year.trim();
        if year.is_empty() {
            return Err(BoardError::Validation("year key is required".to_string()));
        }
        if state.scorecard_history.contains_key(year) {
            tracing::warn!("Can't archive - the key '{}' already exists", year);
            return Err(BoardError::YearExists(year.to_string()));
        }

        tracing::info!(
            "Year ending for {}. Point buckets are discarded; only level and total are archived",
            year
        );

        let standings = self.standings(state);
        let archived = standings.len();

        state.tasks.clear();
        state
            .scorecard_history
            .insert(year.to_string(), standings);
        state.scorecards.clear();

        let base = &self.levels.base().name;
        for user in state.users.values_mut() {
            user.level = Some(base.clone());
            user.level_changed = None;
        }

        tracing::info!("Archived {} scorecards under {}", archived, year);
        Ok(year.to_string())
    }

    /// Ranked standings of every user with a non-empty scorecard
    fn standings(&self, state: &StoreState) -> YearStandings {
        let mut totals: Vec<(&str, i64)> = state
            .scorecards
            .iter()
            .filter(|(_, card)| !card.is_empty())
            .map(|(id, card)| (id.as_str(), card.total()))
            .collect();
        rank_by_total(&mut totals);

        let entries = totals
            .into_iter()
            .map(|(id, total)| {
                let level = match state.users.get(id) {
                    Some(user) => user.level_or(&self.levels.base().name).to_string(),
                    // Orphaned scorecard: derive the level from the points
                    None => self.levels.level_for_points(total).name.clone(),
                };
                (id.to_string(), Standing::new(level, total))
            })
            .collect();

        YearStandings::from_ranked(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Scorecard, Task, User};
    use chrono::Utc;

    fn card(points: &[(&str, i64)]) -> Scorecard {
        points.iter().map(|(p, v)| (p.to_string(), *v)).collect()
    }

    fn state() -> StoreState {
        let mut state = StoreState::default();
        state.users.insert(
            "amy".to_string(),
            User {
                level: Some("RED".to_string()),
                level_changed: Some(Utc::now()),
                ..Default::default()
            },
        );
        state
            .scorecards
            .insert("amy".to_string(), card(&[("github", 30), ("trello.cards", 12)]));
        state.tasks.push(Task::new(1, "Write docs", "amy"));
        state
    }

    #[test]
    fn test_archive_snapshots_and_resets() {
        let levels = LevelTable::default_table();
        let mut state = state();

        let year = YearEndArchiver::new(&levels).archive(&mut state, "2024").unwrap();

        assert_eq!(year, "2024");
        assert_eq!(
            state.scorecard_history["2024"].get("amy"),
            Some(&Standing::new("RED", 42))
        );
        assert!(state.scorecards.is_empty());
        assert!(state.tasks.is_empty());

        let amy = &state.users["amy"];
        assert_eq!(amy.level.as_deref(), Some("ZERO"));
        assert!(amy.level_changed.is_none());
    }

    #[test]
    fn test_second_archive_for_same_year_is_a_conflict() {
        let levels = LevelTable::default_table();
        let archiver = YearEndArchiver::new(&levels);
        let mut state = state();
        archiver.archive(&mut state, "2024").unwrap();

        // New activity after the first archive
        state.scorecards.insert("amy".to_string(), card(&[("github", 5)]));
        state.tasks.push(Task::new(2, "More docs", "amy"));
        let before = state.clone();

        let err = archiver.archive(&mut state, "2024").unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(state, before);
    }

    #[test]
    fn test_standings_ranked_with_id_tie_break() {
        let levels = LevelTable::default_table();
        let mut state = StoreState::default();
        for (id, points) in [("cat", 5), ("bob", 20), ("amy", 5), ("dan", 0)] {
            state.users.insert(id.to_string(), User::default());
            state.scorecards.insert(id.to_string(), card(&[("pool", points)]));
        }
        state.users.insert("eve".to_string(), User::default());
        state.scorecards.insert("eve".to_string(), Scorecard::default());

        YearEndArchiver::new(&levels).archive(&mut state, "2023").unwrap();

        let year = &state.scorecard_history["2023"];
        let order: Vec<&str> = year.iter().map(|(id, _)| id).collect();
        assert_eq!(order, vec!["bob", "amy", "cat", "dan"]);
        assert!(year.get("eve").is_none());
        assert_eq!(year.get("bob"), Some(&Standing::new("ZERO", 20)));
    }

    #[test]
    fn test_orphaned_scorecard_level_from_points() {
        let levels = LevelTable::default_table();
        let mut state = StoreState::default();
        state.scorecards.insert("gone".to_string(), card(&[("pool", 41)]));

        YearEndArchiver::new(&levels).archive(&mut state, "2022").unwrap();

        assert_eq!(
            state.scorecard_history["2022"].get("gone"),
            Some(&Standing::new("RED", 41))
        );
    }

    #[test]
    fn test_blank_year_rejected() {
        let levels = LevelTable::default_table();
        let mut state = state();
        let before = state.clone();

        let err = YearEndArchiver::new(&levels).archive(&mut state, " ").unwrap_err();
        assert!(matches!(err, BoardError::Validation(_)));
        assert_eq!(state, before);
    }
}
