//! Level (belt) thresholds
//!
//! A level table is an ordered list of `minPoints:LEVEL` pairs, strictly
//! ascending by points. The first entry is the base level, the last the top.

use std::sync::OnceLock;

use serde::Serialize;

use crate::config::DEFAULT_THRESHOLDS;
use crate::domain::STANDING_SEPARATOR;
use crate::error::ThresholdError;

/// One level and the points needed to reach it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Threshold {
    pub min_points: i64,
    pub name: String,
}

/// Ordered, non-empty level table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelTable {
    levels: Vec<Threshold>,
}

impl LevelTable {
    /// Parse a `minPoints:LEVEL,...` string.
    ///
    /// Pairs without exactly one `:` are skipped. Non-numeric points, an
    /// out-of-order table or a table with no usable pairs are errors.
    pub fn parse(config: &str) -> Result<Self, ThresholdError> {
        let mut levels: Vec<Threshold> = Vec::new();

        for pair in config.split(',') {
            let fields: Vec<&str> = pair.split(':').collect();
            let [points, name] = fields.as_slice() else {
                tracing::debug!("Skipping malformed level pair '{}'", pair);
                continue;
            };

            let min_points = points
                .trim()
                .parse::<i64>()
                .map_err(|_| ThresholdError::InvalidPoints(points.trim().to_string()))?;

            if let Some(previous) = levels.last() {
                if min_points <= previous.min_points {
                    return Err(ThresholdError::NotAscending {
                        previous: previous.min_points,
                        next: min_points,
                    });
                }
            }

            let name = name.trim();
            if !Self::is_valid_name(name) {
                return Err(ThresholdError::InvalidName(name.to_string()));
            }

            levels.push(Threshold {
                min_points,
                name: name.to_string(),
            });
        }

        if levels.is_empty() {
            return Err(ThresholdError::Empty);
        }
        Ok(Self { levels })
    }

    /// Whether `name` can be stored as a level: non-empty and free of the
    /// characters that delimit thresholds and archived standings
    pub fn is_valid_name(name: &str) -> bool {
        !name.is_empty() && !name.contains([STANDING_SEPARATOR, ',', ':'])
    }

    /// The built-in default table
    pub fn default_table() -> Self {
        let levels = [(0, "ZERO"), (5, "BLUE"), (20, "GREY"), (40, "RED"), (75, "BLACK")]
            .into_iter()
            .map(|(min_points, name)| Threshold {
                min_points,
                name: name.to_string(),
            })
            .collect();
        Self { levels }
    }

    /// Build from configuration, falling back to the default table when the
    /// value is absent or unusable.
    pub fn from_config(config: Option<&str>) -> Self {
        let Some(raw) = config.filter(|s| !s.trim().is_empty()) else {
            return Self::default_table();
        };

        match Self::parse(raw) {
            Ok(table) => table,
            Err(e) => {
                tracing::warn!(
                    "Invalid level thresholds '{}' ({}), using default '{}'",
                    raw,
                    e,
                    DEFAULT_THRESHOLDS
                );
                Self::default_table()
            }
        }
    }

    /// The zero/entry level
    pub fn base(&self) -> &Threshold {
        &self.levels[0]
    }

    /// The highest level
    pub fn top(&self) -> &Threshold {
        &self.levels[self.levels.len() - 1]
    }

    /// All levels, lowest first
    pub fn levels(&self) -> &[Threshold] {
        &self.levels
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.levels.iter().position(|l| l.name == name)
    }

    /// Exact-match lookup by name
    pub fn level(&self, name: &str) -> Option<&Threshold> {
        self.position(name).map(|i| &self.levels[i])
    }

    /// Highest level whose minimum does not exceed `points` (base when below all)
    pub fn level_for_points(&self, points: i64) -> &Threshold {
        self.levels
            .iter()
            .rev()
            .find(|l| points >= l.min_points)
            .unwrap_or_else(|| self.base())
    }

    /// Level after `name`; the top level is its own next level
    pub fn next_level(&self, name: &str) -> Option<&Threshold> {
        let i = self.position(name)?;
        Some(&self.levels[(i + 1).min(self.levels.len() - 1)])
    }

    /// Level before `name`; the base level is its own previous level
    pub fn last_level(&self, name: &str) -> Option<&Threshold> {
        let i = self.position(name)?;
        Some(&self.levels[i.saturating_sub(1)])
    }

    /// Points still needed to reach the level after `name` (never negative)
    pub fn points_to_next_level(&self, name: &str, current_total: i64) -> Option<i64> {
        self.next_level(name)
            .map(|next| next.min_points.saturating_sub(current_total).max(0))
    }

    /// Whether `name` matches the base level, ignoring case
    pub fn is_base(&self, name: &str) -> bool {
        self.base().name.eq_ignore_ascii_case(name)
    }

    /// Rank of a level name in the table (0 = base)
    pub fn rank(&self, name: &str) -> Option<usize> {
        self.position(name)
    }
}

/// Level lookups over a table that is resolved from configuration on first use
#[derive(Debug, Default)]
pub struct LevelEngine {
    source: Option<String>,
    table: OnceLock<LevelTable>,
}

impl LevelEngine {
    /// Engine over a threshold string (`None` means the default table)
    pub fn new(thresholds: Option<&str>) -> Self {
        Self {
            source: thresholds.map(str::to_string),
            table: OnceLock::new(),
        }
    }

    /// The resolved table
    pub fn table(&self) -> &LevelTable {
        self.table
            .get_or_init(|| LevelTable::from_config(self.source.as_deref()))
    }

    pub fn base(&self) -> &Threshold {
        self.table().base()
    }

    pub fn top(&self) -> &Threshold {
        self.table().top()
    }

    pub fn level(&self, name: &str) -> Option<&Threshold> {
        self.table().level(name)
    }

    pub fn level_for_points(&self, points: i64) -> &Threshold {
        self.table().level_for_points(points)
    }

    pub fn next_level(&self, name: &str) -> Option<&Threshold> {
        self.table().next_level(name)
    }

    pub fn last_level(&self, name: &str) -> Option<&Threshold> {
        self.table().last_level(name)
    }

    pub fn points_to_next_level(&self, name: &str, current_total: i64) -> Option<i64> {
        self.table().points_to_next_level(name, current_total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(config: &str) -> LevelEngine {
        LevelEngine::new(Some(config))
    }

    #[test]
    fn test_level_for_points() {
        let levels = engine("0:ZERO,5:BLUE,20:GREY");
        assert_eq!(levels.level_for_points(0).name, "ZERO");
        assert_eq!(levels.level_for_points(4).name, "ZERO");
        assert_eq!(levels.level_for_points(5).name, "BLUE");
        assert_eq!(levels.level_for_points(19).name, "BLUE");
        assert_eq!(levels.level_for_points(20).name, "GREY");
        assert_eq!(levels.level_for_points(10_000).name, "GREY"); // Beyond top
        assert_eq!(levels.level_for_points(-7).name, "ZERO"); // Below base
    }

    #[test]
    fn test_points_to_next_level_examples() {
        let levels = engine("0:ZERO,5:BLUE,20:GREY");

        let level = levels.level_for_points(4);
        assert_eq!(level.name, "ZERO");
        assert_eq!(levels.points_to_next_level(&level.name, 4), Some(1));

        let level = levels.level_for_points(5);
        assert_eq!(level.name, "BLUE");
        assert_eq!(levels.points_to_next_level(&level.name, 5), Some(15));

        // Already past the next threshold
        assert_eq!(levels.points_to_next_level("ZERO", 30), Some(0));
    }

    #[test]
    fn test_level_for_points_is_monotonic() {
        let levels = LevelEngine::new(None);
        let table = levels.table();
        let mut previous_rank = 0;
        for points in -10..200 {
            let rank = table.rank(&table.level_for_points(points).name).unwrap();
            assert!(rank >= previous_rank, "rank dropped at {points}");
            previous_rank = rank;
        }
    }

    #[test]
    fn test_next_and_last_level_clamp() {
        let levels = LevelEngine::new(None);
        assert_eq!(levels.next_level("ZERO").unwrap().name, "BLUE");
        assert_eq!(levels.next_level("BLACK").unwrap().name, "BLACK");
        assert_eq!(levels.last_level("BLUE").unwrap().name, "ZERO");
        assert_eq!(levels.last_level("ZERO").unwrap().name, "ZERO");
        assert_eq!(levels.points_to_next_level("BLACK", 100), Some(0));
        assert_eq!(levels.points_to_next_level("ZERO", i64::MIN), Some(i64::MAX));
    }

    #[test]
    fn test_unknown_level_is_absent() {
        let levels = LevelEngine::new(None);
        assert!(levels.level("PURPLE").is_none());
        assert!(levels.next_level("PURPLE").is_none());
        assert!(levels.last_level("PURPLE").is_none());
        assert!(levels.points_to_next_level("black", 0).is_none()); // Exact match only
    }

    #[test]
    fn test_malformed_pairs_are_skipped() {
        let table = LevelTable::parse("0:ZERO, 5:BLUE:EXTRA ,oops, 20 : GREY").unwrap();
        let names: Vec<&str> = table.levels().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["ZERO", "GREY"]);
        assert_eq!(table.top().min_points, 20);
    }

    #[test]
    fn test_unusable_tables_fall_back_to_default() {
        assert_eq!(LevelTable::parse("nothing"), Err(ThresholdError::Empty));
        assert!(matches!(
            LevelTable::parse("0:ZERO,x:BLUE"),
            Err(ThresholdError::InvalidPoints(_))
        ));
        assert_eq!(
            LevelTable::parse("0:ZERO,5:BLUE,5:GREY"),
            Err(ThresholdError::NotAscending { previous: 5, next: 5 })
        );

        assert_eq!(
            LevelTable::parse("0:ZE|RO,5:BLUE"),
            Err(ThresholdError::InvalidName("ZE|RO".to_string()))
        );
        assert_eq!(
            LevelTable::parse("0: ,5:BLUE"),
            Err(ThresholdError::InvalidName(String::new()))
        );

        for config in [None, Some(""), Some("nothing"), Some("10:A,5:B"), Some("0:ZE|RO")] {
            assert_eq!(LevelTable::from_config(config), LevelTable::default_table());
        }
        assert_eq!(
            LevelTable::parse(DEFAULT_THRESHOLDS).unwrap(),
            LevelTable::default_table()
        );
    }

    #[test]
    fn test_base_level_case_insensitive() {
        let table = LevelTable::default_table();
        assert!(table.is_base("zero"));
        assert!(table.is_base("ZERO"));
        assert!(!table.is_base("BLUE"));
    }
}
