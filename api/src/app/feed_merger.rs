//! Feed merger
//!
//! Normalizes one page from each source into the common envelope and orders
//! the result newest first.

use chrono::{DateTime, Utc};

use crate::domain::entities::{ArticleItem, FeedItem, FeedPayload, PortfolioItem};

/// Merge a page of projects and a page of articles, newest first.
///
/// Items without a timestamp sort as "now", i.e. at the top. Ties keep fetch
/// order, projects before articles.
pub fn merge(projects: Vec<PortfolioItem>, articles: Vec<ArticleItem>) -> Vec<FeedItem> {
    merge_at(projects, articles, Utc::now())
}

/// `merge` with an explicit "now" for undated items
pub fn merge_at(
    projects: Vec<PortfolioItem>,
    articles: Vec<ArticleItem>,
    now: DateTime<Utc>,
) -> Vec<FeedItem> {
    let mut items: Vec<FeedItem> = Vec::with_capacity(projects.len() + articles.len());

    items.extend(projects.into_iter().map(|project| FeedItem {
        id: project.id.clone(),
        created_at: project.created_at.unwrap_or(now),
        payload: FeedPayload::Project(project),
    }));

    items.extend(articles.into_iter().map(|article| FeedItem {
        id: article.id.clone(),
        created_at: article.date.unwrap_or(now),
        payload: FeedPayload::Article(article),
    }));

    // sort_by is stable
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    items
}
