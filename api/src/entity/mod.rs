//! SeaORM entities
//!
//! Table models for the content the feed reads. Schema lives in
//! `migrations/`.

pub mod articles;
pub mod portfolio_items;
