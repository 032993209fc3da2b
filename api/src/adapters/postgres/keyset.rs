//! Keyset pagination helpers shared by the PostgreSQL sources
//!
//! Pages are ordered by `(sort column, id)`. The cursor is the id of the last
//! row returned; the next page starts strictly after that row's position.
//! Sort columns are nullable: PostgreSQL puts NULLs first when descending and
//! last when ascending, and the conditions here follow that placement.

use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{ColumnTrait, Condition, Order};
use uuid::Uuid;

use crate::domain::ports::SortDirection;
use crate::error::DomainError;

/// Parse a cursor into a row id
pub fn parse_cursor(cursor: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(cursor).map_err(|_| DomainError::InvalidCursor(cursor.to_string()))
}

pub fn order(direction: SortDirection) -> Order {
    match direction {
        SortDirection::Asc => Order::Asc,
        SortDirection::Desc => Order::Desc,
    }
}

/// Rows positioned after the anchor row `(anchor_value, anchor_id)`
pub fn keyset_after<C: ColumnTrait>(
    sort_col: C,
    id_col: C,
    anchor_value: Option<DateTimeWithTimeZone>,
    anchor_id: Uuid,
    direction: SortDirection,
) -> Condition {
    match (direction, anchor_value) {
        (SortDirection::Desc, Some(value)) => Condition::any()
            .add(sort_col.lt(value))
            .add(
                Condition::all()
                    .add(sort_col.eq(value))
                    .add(id_col.lt(anchor_id)),
            ),
        (SortDirection::Desc, None) => Condition::any().add(sort_col.is_not_null()).add(
            Condition::all()
                .add(sort_col.is_null())
                .add(id_col.lt(anchor_id)),
        ),
        (SortDirection::Asc, Some(value)) => Condition::any()
            .add(sort_col.gt(value))
            .add(
                Condition::all()
                    .add(sort_col.eq(value))
                    .add(id_col.gt(anchor_id)),
            )
            .add(sort_col.is_null()),
        (SortDirection::Asc, None) => Condition::all()
            .add(sort_col.is_null())
            .add(id_col.gt(anchor_id)),
    }
}
