//! Source links recorded with point events
//!
//! The integration that awards points passes a small set of parameters whose
//! `id` prefix says where the points came from. The link is rendered as
//! markdown for the event log.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Where a point award originated, by `id` prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkSource {
    /// `TR...` - a tracker card
    Trello,
    /// `GH...` - an issue or pull request
    GitHub,
    /// `SS...` - a spreadsheet row
    Smartsheet,
}

impl LinkSource {
    pub fn classify(id: &str) -> Option<Self> {
        if id.starts_with("TR") {
            Some(Self::Trello)
        } else if id.starts_with("GH") {
            Some(Self::GitHub)
        } else if id.starts_with("SS") {
            Some(Self::Smartsheet)
        } else {
            None
        }
    }
}

/// Parameters describing the origin of a point award
///
/// `id` is always present; everything else is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkParams {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_id: Option<String>,

    /// Free-text pool hint from the source (e.g. "github.pulls")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_id: Option<String>,

    /// Parameters with no meaning for link rendering
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl LinkParams {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Build from `key=value` style pairs using the wire key names
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let value = value.into();
            match key.into().as_str() {
                "id" => params.id = value,
                "linkId" => params.link_id = Some(value),
                "pool" => params.pool = Some(value),
                "org" => params.org = Some(value),
                "board" => params.board = Some(value),
                "rowId" => params.row_id = Some(value),
                other => {
                    params.extra.insert(other.to_string(), value);
                }
            }
        }
        params
    }

    /// Whether anything besides the mandatory `id` was supplied
    pub fn has_details(&self) -> bool {
        self.link_id.is_some()
            || self.pool.is_some()
            || self.org.is_some()
            || self.board.is_some()
            || self.row_id.is_some()
            || !self.extra.is_empty()
    }

    /// Render the markdown link, or an empty string when there is nothing to link to
    pub fn render(&self) -> String {
        if !self.has_details() {
            return String::new();
        }
        let Some(link_id) = self.link_id.as_deref() else {
            return String::new();
        };

        match LinkSource::classify(&self.id) {
            Some(LinkSource::Trello) => format!(
                "[Trello: {}/{}](https://trello.com/c/{})",
                link_id, self.id, link_id
            ),
            Some(LinkSource::GitHub) => {
                let (Some(org), Some(board)) = (self.org.as_deref(), self.board.as_deref()) else {
                    return String::new();
                };
                let kind = if self.is_pull_request() { "pull" } else { "issues" };
                format!("<https://github.com/{}/{}/{}/{}>", org, board, kind, link_id)
            }
            Some(LinkSource::Smartsheet) => {
                let Some(board) = self.board.as_deref() else {
                    return String::new();
                };
                let anchor = self
                    .row_id
                    .as_deref()
                    .map(|row| format!("?rowId={}", row))
                    .unwrap_or_default();
                format!(
                    "[Smartsheets: {}](https://app.smartsheet.com/sheets/{}{})",
                    link_id, board, anchor
                )
            }
            None => String::new(),
        }
    }

    fn is_pull_request(&self) -> bool {
        self.pool
            .as_deref()
            .is_some_and(|pool| pool.to_lowercase().contains("pull"))
    }
}
