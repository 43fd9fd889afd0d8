//! Year-end standings
//!
//! Each archived year maps user ids to a [`Standing`] (level and total), kept in
//! rank order. On disk a standing is the string `"LEVEL|total"`; it is parsed when
//! the document is read so nothing downstream handles the raw form.

use std::fmt;
use std::str::FromStr;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Separator between level and total in the stored form
pub const STANDING_SEPARATOR: char = '|';

/// Why a `"LEVEL|total"` string could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StandingParseError {
    #[error("expected 'LEVEL|total', got '{0}'")]
    MissingSeparator(String),

    #[error("total '{0}' is not an integer")]
    InvalidTotal(String),
}

/// A user's archived level and point total
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standing {
    pub level: String,
    pub total: i64,
}

impl Standing {
    pub fn new(level: impl Into<String>, total: i64) -> Self {
        Self {
            level: level.into(),
            total,
        }
    }
}

impl fmt::Display for Standing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.level, self.total)
    }
}

impl FromStr for Standing {
    type Err = StandingParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (level, total) = s
            .rsplit_once(STANDING_SEPARATOR)
            .ok_or_else(|| StandingParseError::MissingSeparator(s.to_string()))?;
        let total = total
            .trim()
            .parse()
            .map_err(|_| StandingParseError::InvalidTotal(total.to_string()))?;
        Ok(Self::new(level, total))
    }
}

impl Serialize for Standing {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Standing {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Ranked standings for one archived year
///
/// Serialized as a map whose key order is the rank order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct YearStandings {
    entries: Vec<(String, Standing)>,
}

impl YearStandings {
    /// Build from entries already in rank order
    pub fn from_ranked(entries: Vec<(String, Standing)>) -> Self {
        Self { entries }
    }

    /// The standing recorded for a user, if they took part that year
    pub fn get(&self, user: &str) -> Option<&Standing> {
        self.entries
            .iter()
            .find(|(id, _)| id == user)
            .map(|(_, standing)| standing)
    }

    /// Entries in rank order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Standing)> {
        self.entries.iter().map(|(id, standing)| (id.as_str(), standing))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for YearStandings {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(id, standing)| (id, standing)))
    }
}

impl<'de> Deserialize<'de> for YearStandings {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct StandingsVisitor;

        impl<'de> Visitor<'de> for StandingsVisitor {
            type Value = YearStandings;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of user id to 'LEVEL|total'")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((id, standing)) = map.next_entry::<String, Standing>()? {
                    entries.push((id, standing));
                }
                Ok(YearStandings { entries })
            }
        }

        deserializer.deserialize_map(StandingsVisitor)
    }
}
