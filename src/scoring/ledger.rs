//! Points ledger: the only writer of scorecards and the event log

use crate::domain::Event;
use crate::error::{BoardError, Result};
use crate::store::StoreState;

use super::link::LinkParams;

/// Applies point increments and keeps the event log within its ceiling
#[derive(Debug, Clone)]
pub struct PointsLedger {
    events_max: usize,
}

impl PointsLedger {
    /// Ledger whose event log never holds more than `events_max` entries
    pub fn new(events_max: usize) -> Self {
        Self { events_max }
    }

    pub fn events_max(&self) -> usize {
        self.events_max
    }

    /// Add `delta` points to `user` in `pool` and record the event.
    ///
    /// Nothing changes when a key is blank or the user is not registered.
    pub fn increment(
        &self,
        state: &mut StoreState,
        user: &str,
        pool: &str,
        delta: i64,
        link: &LinkParams,
    ) -> Result<i64> {
        if user.trim().is_empty() || pool.trim().is_empty() {
            tracing::error!(
                "Unable to add due to missing key [pool={:?}, user={:?}]",
                pool,
                user
            );
            return Err(BoardError::Validation(
                "both user and pool are required".to_string(),
            ));
        }

        if !state.is_registered(user) {
            tracing::debug!("Unregistered user detected [{}]", user);
            return Err(BoardError::UserNotFound(user.to_string()));
        }

        tracing::info!(
            "Incrementing points: user={}, pool={}, points={}, link={}",
            user,
            pool,
            delta,
            link.id
        );
        // A missing card never overflows, so nothing is created on rejection
        let Some(points) = state
            .scorecards
            .entry(user.to_string())
            .or_default()
            .add(pool, delta)
        else {
            tracing::error!(
                "Rejecting increment that overflows pool [user={}, pool={}, points={}]",
                user,
                pool,
                delta
            );
            return Err(BoardError::Validation(format!(
                "adding {} to {}.{} overflows",
                delta, user, pool
            )));
        };

        let source = if link.has_details() {
            link.render()
        } else {
            String::new()
        };
        self.record(state, Event::points(user, pool, delta, source));

        Ok(points)
    }

    /// Append an event, evicting the oldest entries beyond the ceiling
    pub fn record(&self, state: &mut StoreState, event: Event) {
        state.events.push_back(event);
        while state.events.len() > self.events_max {
            state.events.pop_front();
        }
    }
}
