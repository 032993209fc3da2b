//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.

pub mod feed;

pub use feed::{close_feed, get_feed, load_more, open_feed, refresh_feed};
