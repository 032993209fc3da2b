//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod hosted;
pub mod postgres;

pub use hosted::{HostedArticleSource, HostedClient, HostedPortfolioSource};
pub use postgres::{PostgresArticleSource, PostgresPortfolioSource};
