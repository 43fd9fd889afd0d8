//! Core record types for beltboard

mod event;
mod history;
mod scorecard;
mod task;
mod user;

pub use event::{Event, EventKind};
pub use history::{Standing, StandingParseError, YearStandings, STANDING_SEPARATOR};
pub use scorecard::{pool_category, Scorecard};
pub use task::{Task, TODO_LIST};
pub use user::{User, DISPLAY_NAME};
