//! Article domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A blog article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleItem {
    /// Native identifier, unique among articles only
    pub id: String,
    pub author_id: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub slug: Option<String>,
    /// Publication date; absent for drafts imported without one
    pub date: Option<DateTime<Utc>>,
}
