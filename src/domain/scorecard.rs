use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Category part of a pool key: the text before the first dot
pub fn pool_category(pool: &str) -> &str {
    pool.split_once('.').map_or(pool, |(category, _)| category)
}

fn clamp_to_i64(sum: i128) -> i64 {
    sum.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}

/// A user's points per pool
///
/// Values are not clamped: increments may be negative and totals may go below zero.
/// Sums are exact and then clamped to the `i64` range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scorecard(BTreeMap<String, i64>);

impl Scorecard {
    /// Sum over all pools
    pub fn total(&self) -> i64 {
        clamp_to_i64(self.0.values().copied().map(i128::from).sum())
    }

    /// Add `delta` to a pool, creating it at zero first.
    ///
    /// Returns `None` and leaves the pool untouched when the result would overflow.
    pub fn add(&mut self, pool: &str, delta: i64) -> Option<i64> {
        let points = self.get(pool).unwrap_or(0).checked_add(delta)?;
        self.0.insert(pool.to_string(), points);
        Some(points)
    }

    /// Overwrite a pool's points
    pub fn set(&mut self, pool: &str, points: i64) {
        self.0.insert(pool.to_string(), points);
    }

    pub fn get(&self, pool: &str) -> Option<i64> {
        self.0.get(pool).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Pools in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.0.iter().map(|(pool, points)| (pool.as_str(), *points))
    }

    /// Points consolidated by pool category
    pub fn by_category(&self) -> BTreeMap<String, i64> {
        let mut totals: BTreeMap<String, i128> = BTreeMap::new();
        for (pool, points) in self.iter() {
            *totals.entry(pool_category(pool).to_string()).or_default() += i128::from(points);
        }
        totals
            .into_iter()
            .map(|(category, sum)| (category, clamp_to_i64(sum)))
            .collect()
    }
}

impl FromIterator<(String, i64)> for Scorecard {
    fn from_iter<T: IntoIterator<Item = (String, i64)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_category() {
        assert_eq!(pool_category("mentoring.sessions"), "mentoring");
        assert_eq!(pool_category("mentoring"), "mentoring");
        assert_eq!(pool_category("a.b.c"), "a");
    }

    #[test]
    fn test_add_creates_pool_and_allows_negative() {
        let mut card = Scorecard::default();
        assert_eq!(card.add("teamA", 10), Some(10));
        assert_eq!(card.add("teamA", -15), Some(-5));
        assert_eq!(card.total(), -5);
    }

    #[test]
    fn test_add_refuses_overflow_and_sums_saturate() {
        let mut card = Scorecard::default();
        assert_eq!(card.add("a", i64::MAX), Some(i64::MAX));
        assert_eq!(card.add("a", 1), None);
        assert_eq!(card.get("a"), Some(i64::MAX));

        card.set("b", 1);
        card.set("c.x", i64::MIN);
        card.set("c.y", -1);
        assert_eq!(card.total(), -1);
        assert_eq!(card.by_category().get("c"), Some(&i64::MIN));

        card.set("c.x", 0);
        assert_eq!(card.total(), i64::MAX);
    }

    #[test]
    fn test_by_category_sums_sub_pools() {
        let card: Scorecard = [
            ("mentoring.sessions".to_string(), 3),
            ("mentoring.reviews".to_string(), 4),
            ("github".to_string(), 5),
        ]
        .into_iter()
        .collect();

        let totals = card.by_category();
        assert_eq!(totals.get("mentoring"), Some(&7));
        assert_eq!(totals.get("github"), Some(&5));
        assert_eq!(card.total(), 12);
    }
}
