use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Attribute key for the display name
pub const DISPLAY_NAME: &str = "displayName";

/// A registered participant
///
/// The user id is the key of the directory map, not a field of the record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Name shown on the leaderboard
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Current level (belt) name; `None` means the base level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    /// Geography, e.g. "EMEA"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo: Option<String>,

    /// When the level last changed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level_changed: Option<DateTime<Utc>>,

    /// Open-ended string attributes (external tracker ids and similar)
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl User {
    /// Label for charts: display name when present, otherwise the id
    pub fn label<'a>(&'a self, id: &'a str) -> &'a str {
        self.display_name.as_deref().unwrap_or(id)
    }

    /// Level name, falling back to `base` when none is recorded
    pub fn level_or<'a>(&'a self, base: &'a str) -> &'a str {
        self.level.as_deref().unwrap_or(base)
    }

    /// All properties flattened into one string map, as shown to callers
    pub fn properties(&self) -> BTreeMap<String, String> {
        let mut props = self.attributes.clone();
        if let Some(name) = &self.display_name {
            props.insert(DISPLAY_NAME.to_string(), name.clone());
        }
        if let Some(level) = &self.level {
            props.insert("level".to_string(), level.clone());
        }
        if let Some(geo) = &self.geo {
            props.insert("geo".to_string(), geo.clone());
        }
        if let Some(changed) = &self.level_changed {
            props.insert("levelChanged".to_string(), changed.to_rfc3339());
        }
        props
    }

    /// Look up a property by its external key
    pub fn property(&self, key: &str) -> Option<&str> {
        match key {
            DISPLAY_NAME => self.display_name.as_deref(),
            "level" => self.level.as_deref(),
            "geo" => self.geo.as_deref(),
            _ => self.attributes.get(key).map(String::as_str),
        }
    }

    /// Set a property by its external key
    pub fn set_property(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match key {
            DISPLAY_NAME => self.display_name = Some(value),
            "level" => self.level = Some(value),
            "geo" => self.geo = Some(value),
            _ => {
                self.attributes.insert(key.to_string(), value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_prefers_display_name() {
        let mut user = User::default();
        assert_eq!(user.label("bob"), "bob");
        user.display_name = Some("Bob B".to_string());
        assert_eq!(user.label("bob"), "Bob B");
    }

    #[test]
    fn test_properties_flatten_known_fields() {
        let mut user = User::default();
        user.set_property(DISPLAY_NAME, "Bob");
        user.set_property("geo", "EMEA");
        user.set_property("githubId", "bob-gh");

        let props = user.properties();
        assert_eq!(props.get("displayName").map(String::as_str), Some("Bob"));
        assert_eq!(props.get("geo").map(String::as_str), Some("EMEA"));
        assert_eq!(props.get("githubId").map(String::as_str), Some("bob-gh"));
        assert!(!props.contains_key("level"));
        assert_eq!(user.property("githubId"), Some("bob-gh"));
    }
}
