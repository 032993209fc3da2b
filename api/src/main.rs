//! Folio API Server
//!
//! Serves the merged portfolio and blog feed: projects and articles from two
//! cursor-paginated sources, interleaved newest first, scrolled page by page.
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use sea_orm::Database;
use serde::Serialize;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;
use tower_governor::GovernorLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod config;
mod domain;
mod entity;
mod error;
mod feed;
mod handlers;

#[cfg(test)]
mod test_utils;

#[cfg(test)]
mod integration_tests;

use adapters::{
    HostedArticleSource, HostedClient, HostedPortfolioSource, PostgresArticleSource,
    PostgresPortfolioSource,
};
use app::{FeedSessions, FeedSettings, RetryPolicy, RetryingSource};
use config::{Backend, Config};
use domain::ports::{ArticleSource, PagedSource, ProjectSource};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<FeedSessions>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    sessions: usize,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        sessions: state.sessions.len(),
    })
}

/// Routes without the per-IP rate limit, which needs the peer address
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/feeds", post(handlers::open_feed))
        .route(
            "/feeds/:id",
            get(handlers::get_feed).delete(handlers::close_feed),
        )
        .route("/feeds/:id/more", post(handlers::load_more))
        .route("/feeds/:id/refresh", post(handlers::refresh_feed))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Wrap a source in retries when the deployment asks for them
fn with_retries<S>(source: S, policy: Option<RetryPolicy>) -> Arc<dyn PagedSource<Item = S::Item>>
where
    S: PagedSource + 'static,
    S::Item: 'static,
{
    match policy {
        Some(policy) => Arc::new(RetryingSource::new(source, policy)),
        None => Arc::new(source),
    }
}

async fn build_sources(config: &Config) -> anyhow::Result<(Arc<ProjectSource>, Arc<ArticleSource>)> {
    let policy = (config.source_retries > 0)
        .then(|| RetryPolicy::new(config.source_retries, config.retry_base));

    match config.backend {
        Backend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set")?;
            tracing::info!("Connecting to database...");
            let db = Database::connect(url)
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Database connected");

            Ok((
                with_retries(PostgresPortfolioSource::new(db.clone()), policy),
                with_retries(PostgresArticleSource::new(db), policy),
            ))
        }
        Backend::Hosted => {
            let url = config
                .hosted_db_url
                .clone()
                .context("HOSTED_DB_URL must be set")?;
            tracing::info!(url = %url, "Using hosted database");
            let client = HostedClient::new(url, config.hosted_db_key.clone());

            Ok((
                with_retries(HostedPortfolioSource::new(client.clone()), policy),
                with_retries(HostedArticleSource::new(client), policy),
            ))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,folio_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Folio API...");

    // Load configuration
    let config = Config::from_env()?;

    let (projects, articles) = build_sources(&config).await?;

    let sessions = Arc::new(FeedSessions::new(
        projects,
        articles,
        FeedSettings::with_page_size(config.page_size),
        config.session_ttl,
        config.max_sessions,
    ));
    let purge_every = (config.session_ttl / 4).max(Duration::from_secs(1));
    sessions.spawn_purger(purge_every);

    let state = AppState { sessions };

    // Uses PeerIpKeyExtractor to get client IP from socket connection
    // (SmartIpKeyExtractor requires X-Forwarded-For headers from reverse proxy)
    let governor_config = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(PeerIpKeyExtractor)
            .per_second(config.rate_limit_replenish_secs)
            .burst_size(config.rate_limit_burst)
            .finish()
            .context("Failed to build governor config")?,
    );

    let app = build_router(state).layer(GovernorLayer {
        config: governor_config,
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
