//! PostgreSQL source for portfolio items

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect};

use super::keyset::{keyset_after, order, parse_cursor};
use crate::domain::entities::PortfolioItem;
use crate::domain::ports::{Page, PageRequest, PagedSource, SortField};
use crate::entity::portfolio_items;
use crate::error::DomainError;

/// PostgreSQL implementation of the portfolio item source
pub struct PostgresPortfolioSource {
    db: DatabaseConnection,
}

impl PostgresPortfolioSource {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PagedSource for PostgresPortfolioSource {
    type Item = PortfolioItem;

    fn name(&self) -> &'static str {
        "portfolio_items"
    }

    async fn fetch_page(&self, request: &PageRequest) -> Result<Page<PortfolioItem>, DomainError> {
        let sort_col = match request.sort.field {
            SortField::CreatedAt => portfolio_items::Column::CreatedAt,
            SortField::Date => {
                return Err(DomainError::Validation(
                    "portfolio items have no date column".to_string(),
                ))
            }
        };
        let direction = request.sort.direction;

        let mut query = portfolio_items::Entity::find();
        if let Some(cursor) = &request.cursor {
            let anchor_id = parse_cursor(cursor)?;
            let anchor = portfolio_items::Entity::find_by_id(anchor_id)
                .one(&self.db)
                .await?
                .ok_or_else(|| DomainError::InvalidCursor(cursor.clone()))?;
            query = query.filter(keyset_after(
                sort_col,
                portfolio_items::Column::Id,
                anchor.created_at,
                anchor_id,
                direction,
            ));
        }

        let rows = query
            .order_by(sort_col, order(direction))
            .order_by(portfolio_items::Column::Id, order(direction))
            .limit(request.page_size + 1)
            .all(&self.db)
            .await?;

        tracing::debug!(rows = rows.len(), cursor = ?request.cursor, "fetched portfolio page");
        Ok(Page::from_overfetched(rows, request.page_size, |m| m.id.to_string()))
    }
}

/// Convert SeaORM model to domain entity
impl From<portfolio_items::Model> for PortfolioItem {
    fn from(model: portfolio_items::Model) -> Self {
        PortfolioItem {
            id: model.id.to_string(),
            owner_id: model.owner_id.to_string(),
            title: model.title,
            description: model.description,
            cover_url: model.cover_url,
            tags: model
                .tags
                .and_then(|v| serde_json::from_value(v).ok())
                .unwrap_or_default(),
            created_at: model.created_at.map(|dt| dt.with_timezone(&Utc)),
        }
    }
}
