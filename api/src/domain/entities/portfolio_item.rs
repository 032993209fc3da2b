//! Portfolio item domain entity
//!
//! A project a member showcases on their profile.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A portfolio project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioItem {
    /// Native identifier, unique among portfolio items only
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl PortfolioItem {
    /// Check if the item carries the given tag (case-insensitive)
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}
