//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.

use chrono::{DateTime, Utc};

use crate::domain::entities::{parse_timestamp, ArticleItem, PortfolioItem};

/// Parse an RFC 3339 timestamp, panicking on bad input
pub fn ts(raw: &str) -> DateTime<Utc> {
    parse_timestamp(raw).unwrap_or_else(|| panic!("bad test timestamp: {raw}"))
}

/// Create a test portfolio item with the given id and timestamp
pub fn test_project_at(id: &str, created_at: Option<DateTime<Utc>>) -> PortfolioItem {
    PortfolioItem {
        id: id.to_string(),
        owner_id: "user-1".to_string(),
        title: format!("Project {}", id),
        description: Some("A test project".to_string()),
        cover_url: None,
        tags: vec!["illustration".to_string()],
        created_at,
    }
}

/// Create a test article with the given id and publication date
pub fn test_article_at(id: &str, date: Option<DateTime<Utc>>) -> ArticleItem {
    ArticleItem {
        id: id.to_string(),
        author_id: "user-2".to_string(),
        title: format!("Article {}", id),
        excerpt: Some("A test article".to_string()),
        slug: Some(format!("article-{}", id)),
        date,
    }
}

/// Create a test portfolio item with default values
pub fn test_project() -> PortfolioItem {
    test_project_at("p1", Some(ts("2024-06-10T00:00:00Z")))
}

/// Create a test article with default values
pub fn test_article() -> ArticleItem {
    test_article_at("a1", Some(ts("2024-06-12T00:00:00Z")))
}
