//! PostgreSQL source for articles

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect};

use super::keyset::{keyset_after, order, parse_cursor};
use crate::domain::entities::ArticleItem;
use crate::domain::ports::{Page, PageRequest, PagedSource, SortField};
use crate::entity::articles;
use crate::error::DomainError;

/// PostgreSQL implementation of the article source
pub struct PostgresArticleSource {
    db: DatabaseConnection,
}

impl PostgresArticleSource {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PagedSource for PostgresArticleSource {
    type Item = ArticleItem;

    fn name(&self) -> &'static str {
        "articles"
    }

    async fn fetch_page(&self, request: &PageRequest) -> Result<Page<ArticleItem>, DomainError> {
        let sort_col = match request.sort.field {
            SortField::Date => articles::Column::Date,
            SortField::CreatedAt => articles::Column::CreatedAt,
        };
        let direction = request.sort.direction;

        let mut query = articles::Entity::find();
        if let Some(cursor) = &request.cursor {
            let anchor_id = parse_cursor(cursor)?;
            let anchor = articles::Entity::find_by_id(anchor_id)
                .one(&self.db)
                .await?
                .ok_or_else(|| DomainError::InvalidCursor(cursor.clone()))?;
            let anchor_value = match request.sort.field {
                SortField::Date => anchor.date,
                SortField::CreatedAt => anchor.created_at,
            };
            query = query.filter(keyset_after(
                sort_col,
                articles::Column::Id,
                anchor_value,
                anchor_id,
                direction,
            ));
        }

        let rows = query
            .order_by(sort_col, order(direction))
            .order_by(articles::Column::Id, order(direction))
            .limit(request.page_size + 1)
            .all(&self.db)
            .await?;

        tracing::debug!(rows = rows.len(), cursor = ?request.cursor, "fetched article page");
        Ok(Page::from_overfetched(rows, request.page_size, |m| m.id.to_string()))
    }
}

/// Convert SeaORM model to domain entity
impl From<articles::Model> for ArticleItem {
    fn from(model: articles::Model) -> Self {
        ArticleItem {
            id: model.id.to_string(),
            author_id: model.author_id.to_string(),
            title: model.title,
            excerpt: model.excerpt,
            slug: model.slug,
            date: model.date.map(|dt| dt.with_timezone(&Utc)),
        }
    }
}
