//! Content sources backed by the hosted database

use async_trait::async_trait;
use serde::Deserialize;

use super::client::HostedClient;
use crate::domain::entities::{parse_timestamp, ArticleItem, PortfolioItem};
use crate::domain::ports::{Page, PageRequest, PagedSource, SortField};
use crate::error::DomainError;

/// Row of the `portfolio_items` table as the REST API returns it
#[derive(Debug, Deserialize)]
struct PortfolioRow {
    id: String,
    owner_id: String,
    title: String,
    description: Option<String>,
    cover_url: Option<String>,
    #[serde(default)]
    tags: Option<Vec<String>>,
    created_at: Option<String>,
}

impl From<PortfolioRow> for PortfolioItem {
    fn from(row: PortfolioRow) -> Self {
        PortfolioItem {
            id: row.id,
            owner_id: row.owner_id,
            title: row.title,
            description: row.description,
            cover_url: row.cover_url,
            tags: row.tags.unwrap_or_default(),
            created_at: row.created_at.as_deref().and_then(parse_timestamp),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ArticleRow {
    id: String,
    author_id: String,
    title: String,
    excerpt: Option<String>,
    slug: Option<String>,
    date: Option<String>,
}

impl From<ArticleRow> for ArticleItem {
    fn from(row: ArticleRow) -> Self {
        ArticleItem {
            id: row.id,
            author_id: row.author_id,
            title: row.title,
            excerpt: row.excerpt,
            slug: row.slug,
            date: row.date.as_deref().and_then(parse_timestamp),
        }
    }
}

pub struct HostedPortfolioSource {
    client: HostedClient,
}

impl HostedPortfolioSource {
    pub fn new(client: HostedClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PagedSource for HostedPortfolioSource {
    type Item = PortfolioItem;

    fn name(&self) -> &'static str {
        "portfolio_items"
    }

    async fn fetch_page(&self, request: &PageRequest) -> Result<Page<PortfolioItem>, DomainError> {
        if request.sort.field != SortField::CreatedAt {
            return Err(DomainError::Validation(
                "portfolio items have no date column".to_string(),
            ));
        }
        self.client
            .fetch_keyset_page(
                "portfolio_items",
                request.sort.field.column_name(),
                request,
                |row: &PortfolioRow| row.id.clone(),
            )
            .await
    }
}

pub struct HostedArticleSource {
    client: HostedClient,
}

impl HostedArticleSource {
    pub fn new(client: HostedClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PagedSource for HostedArticleSource {
    type Item = ArticleItem;

    fn name(&self) -> &'static str {
        "articles"
    }

    async fn fetch_page(&self, request: &PageRequest) -> Result<Page<ArticleItem>, DomainError> {
        self.client
            .fetch_keyset_page(
                "articles",
                request.sort.field.column_name(),
                request,
                |row: &ArticleRow| row.id.clone(),
            )
            .await
    }
}
