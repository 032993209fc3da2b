//! Feed item envelope
//!
//! The common shape both content sources are normalized into.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ArticleItem, PortfolioItem};

/// Source-shaped payload, tagged by kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum FeedPayload {
    Project(PortfolioItem),
    Article(ArticleItem),
}

/// A merged feed entry: `{id, type, data, createdAt}` on the wire
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    /// Native id of the source item; unique only together with the kind
    pub id: String,
    #[serde(flatten)]
    pub payload: FeedPayload,
    /// Sort key
    pub created_at: DateTime<Utc>,
}
