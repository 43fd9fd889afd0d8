//! User directory maintenance: registration, property edits, promotions, tasks

use std::collections::BTreeMap;

use chrono::Utc;

use crate::domain::{Event, Task, User, DISPLAY_NAME};
use crate::error::{BoardError, Result};
use crate::store::StoreState;

use super::ledger::PointsLedger;
use super::levels::LevelTable;

/// Marker value for users missing an external id
pub const NOT_REGISTERED: &str = "Not Registered?";

/// Whether a caller may set this property on themselves
fn is_user_editable(key: &str) -> bool {
    key == DISPLAY_NAME || key.ends_with("Id")
}

/// Mutating operations on users that go through the event log
pub struct UserDirectory<'a> {
    ledger: &'a PointsLedger,
    levels: &'a LevelTable,
}

impl<'a> UserDirectory<'a> {
    pub fn new(ledger: &'a PointsLedger, levels: &'a LevelTable) -> Self {
        Self { ledger, levels }
    }

    /// Register a new user at the base level
    pub fn register(
        &self,
        state: &mut StoreState,
        id: &str,
        display_name: Option<String>,
        geo: Option<String>,
        attributes: BTreeMap<String, String>,
    ) -> Result<()> {
        let id = id.trim();
        if id.is_empty() {
            return Err(BoardError::Validation("user id is required".to_string()));
        }
        if state.is_registered(id) {
            return Err(BoardError::UserExists(id.to_string()));
        }

        tracing::info!("Registering user {}", id);
        state.users.insert(
            id.to_string(),
            User {
                display_name,
                level: Some(self.levels.base().name.clone()),
                geo,
                level_changed: None,
                attributes,
            },
        );
        Ok(())
    }

    /// Apply self-service property updates.
    ///
    /// Only the display name and `*Id` keys are writable; level edits are
    /// refused and logged. Returns the number of properties that changed.
    pub fn update(
        &self,
        state: &mut StoreState,
        id: &str,
        values: &BTreeMap<String, String>,
    ) -> Result<usize> {
        let user = state
            .users
            .get_mut(id)
            .ok_or_else(|| BoardError::UserNotFound(id.to_string()))?;

        let mut events = Vec::new();
        for (key, value) in values {
            if !is_user_editable(key) {
                if key.contains("level") {
                    tracing::warn!(
                        "Suspicious Activity: User [{}] attempting to update their level \
                         from [{:?}] to [{}]",
                        id,
                        user.level,
                        value
                    );
                }
                continue;
            }

            match user.property(key) {
                None => {
                    events.push(Event::user_update(id, format!("{} added as {}", key, value)));
                }
                Some(existing) if existing != value.as_str() => {
                    events.push(Event::user_update(
                        id,
                        format!("{} changed from {} to {}", key, existing, value),
                    ));
                }
                Some(_) => continue,
            }
            user.set_property(key, value.as_str());
        }

        let changed = events.len();
        for event in events {
            self.ledger.record(state, event);
        }
        Ok(changed)
    }

    /// Administrative edit of scorecard points and user properties.
    ///
    /// Keys naming an existing pool set that pool's points, everything else is
    /// a user property. All point values are validated before anything changes.
    pub fn set_fields(
        &self,
        state: &mut StoreState,
        id: &str,
        values: &BTreeMap<String, String>,
    ) -> Result<usize> {
        let user = state
            .users
            .get(id)
            .ok_or_else(|| BoardError::UserNotFound(id.to_string()))?;
        let card = state.scorecards.get(id);

        enum Change {
            Property { key: String, value: String, text: String },
            Points { pool: String, points: i64, text: String },
        }

        let mut changes = Vec::new();
        for (key, value) in values {
            if key == "userId" {
                continue;
            }
            let is_pool =
                card.is_some_and(|c| c.get(key).is_some()) && user.property(key).is_none();

            if is_pool {
                let current = card.and_then(|c| c.get(key)).unwrap_or_default();
                let points: i64 = value.trim().parse().map_err(|_| {
                    BoardError::Validation(format!(
                        "'{}' is not a valid point value for {}",
                        value, key
                    ))
                })?;
                if points != current {
                    changes.push(Change::Points {
                        pool: key.clone(),
                        points,
                        text: format!("{} changed from {} to {}", key, current, points),
                    });
                }
            } else {
                if key == "level" && !LevelTable::is_valid_name(value) {
                    return Err(BoardError::Validation(format!(
                        "'{}' is not a valid level name",
                        value
                    )));
                }
                let text = match user.property(key) {
                    Some(existing) if existing == value.as_str() => continue,
                    Some(existing) => format!("{} changed from {} to {}", key, existing, value),
                    None => format!("{} set as {}", key, value),
                };
                changes.push(Change::Property {
                    key: key.clone(),
                    value: value.clone(),
                    text,
                });
            }
        }

        let changed = changes.len();
        for change in changes {
            let text = match change {
                Change::Property { key, value, text } => {
                    tracing::debug!("Setting 'userInfo.{}' to {}", key, value);
                    if let Some(user) = state.users.get_mut(id) {
                        user.set_property(&key, value);
                    }
                    text
                }
                Change::Points { pool, points, text } => {
                    tracing::debug!("Setting 'scorecard.{}' to {}", pool, points);
                    state
                        .scorecards
                        .entry(id.to_string())
                        .or_default()
                        .set(&pool, points);
                    text
                }
            };
            self.ledger.record(state, Event::user_update(id, text));
        }
        Ok(changed)
    }

    /// Promote users whose total has reached a higher level.
    ///
    /// Levels never go down here; only the year-end archive resets them.
    pub fn refresh_levels(&self, state: &mut StoreState) -> Vec<String> {
        let base = &self.levels.base().name;
        let mut promotions = Vec::new();

        for (id, user) in &state.users {
            let total = state.total_for(id);
            let earned = self.levels.level_for_points(total);
            let current = user.level_or(base);
            let current_rank = self.levels.rank(current).unwrap_or(0);
            let earned_rank = self.levels.rank(&earned.name).unwrap_or(0);

            if earned_rank > current_rank {
                promotions.push((id.clone(), current.to_string(), earned.name.clone()));
            }
        }

        let now = Utc::now();
        let mut promoted = Vec::with_capacity(promotions.len());
        for (id, from, to) in promotions {
            tracing::info!("Promoting {} from {} to {}", id, from, to);
            if let Some(user) = state.users.get_mut(&id) {
                user.level = Some(to.clone());
                user.level_changed = Some(now);
            }
            self.ledger.record(
                state,
                Event::level_up(&id, format!("level changed from {} to {}", from, to)),
            );
            promoted.push(id);
        }
        promoted
    }

    /// Add a task for a registered user
    pub fn add_task(&self, state: &mut StoreState, title: &str, user: &str) -> Result<Task> {
        if title.trim().is_empty() {
            return Err(BoardError::Validation("task title is required".to_string()));
        }
        if !state.is_registered(user) {
            return Err(BoardError::UserNotFound(user.to_string()));
        }

        state.last_task_num += 1;
        let task = Task::new(state.last_task_num, title.trim(), user);
        state.tasks.push(task.clone());
        Ok(task)
    }
}

/// Record an award key; `true` the first time, `false` when already claimed
pub fn claim_once(state: &mut StoreState, key: &str) -> bool {
    state.points_duplicate_checker.insert(key.to_string())
}

/// Users with no usable value for an external id attribute
pub fn users_missing_attribute(state: &StoreState, key: &str) -> BTreeMap<String, String> {
    state
        .users
        .iter()
        .filter(|(_, user)| {
            user.property(key)
                .map(str::trim)
                .is_none_or(|v| v.is_empty() || v.eq_ignore_ascii_case("null"))
        })
        .map(|(id, _)| (id.clone(), NOT_REGISTERED.to_string()))
        .collect()
}
