//! PostgreSQL adapters
//!
//! Content sources backed by SeaORM and PostgreSQL.

pub mod article_source;
pub mod keyset;
pub mod portfolio_source;


pub use article_source::PostgresArticleSource;
pub use portfolio_source::PostgresPortfolioSource;
