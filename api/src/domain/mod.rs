//! Domain layer
//!
//! Contains the content model and the contracts the feed depends on.
//! - `entities`: Portfolio items, articles and the merged feed envelope
//! - `ports`: Trait definitions for paged content sources

pub mod entities;
pub mod ports;
