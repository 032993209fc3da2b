//! Hosted database adapters
//!
//! Content sources reading from the hosted database's REST API.

pub mod client;
pub mod sources;

pub use client::HostedClient;
pub use sources::{HostedArticleSource, HostedPortfolioSource};
