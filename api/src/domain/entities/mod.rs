//! Domain entities
//!
//! Pure domain models for the content that flows through the feed.
//! These are separate from the SeaORM entities in the `entity` module.

pub mod article;
pub mod feed_item;
pub mod portfolio_item;
pub mod timestamp;

pub use article::ArticleItem;
pub use feed_item::{FeedItem, FeedPayload};
pub use portfolio_item::PortfolioItem;
pub use timestamp::parse_timestamp;
