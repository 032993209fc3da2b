use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

/// Page size both content sources are queried with
pub const DEFAULT_PAGE_SIZE: u64 = 12;

/// Which storage backend the content sources read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Direct PostgreSQL connection through SeaORM
    Postgres,
    /// PostgREST-style REST API of the hosted database
    Hosted,
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" => Ok(Backend::Postgres),
            "hosted" => Ok(Backend::Hosted),
            _ => Err(format!("Unknown backend: {}", s)),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub backend: Backend,
    pub database_url: Option<String>,
    pub hosted_db_url: Option<String>,
    /// API key sent to the hosted database (anon/service key)
    pub hosted_db_key: Option<String>,
    pub port: u16,
    pub page_size: u64,
    /// Retries per source call; 0 leaves sources unwrapped
    pub source_retries: u32,
    pub retry_base: Duration,
    pub session_ttl: Duration,
    pub max_sessions: usize,
    /// Seconds for one rate-limit slot to replenish
    pub rate_limit_replenish_secs: u64,
    pub rate_limit_burst: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let backend = parse_var("FEED_BACKEND", Backend::Postgres)?;
        let config = Self {
            backend,
            database_url: env::var("DATABASE_URL").ok(),
            hosted_db_url: env::var("HOSTED_DB_URL").ok(),
            hosted_db_key: env::var("HOSTED_DB_KEY").ok(),
            port: parse_var("PORT", 8080)?,
            page_size: parse_var("FEED_PAGE_SIZE", DEFAULT_PAGE_SIZE)?,
            source_retries: parse_var("FEED_SOURCE_RETRIES", 0)?,
            retry_base: Duration::from_millis(parse_var("FEED_RETRY_BASE_MS", 250)?),
            session_ttl: Duration::from_secs(parse_var("FEED_SESSION_TTL_SECS", 900)?),
            max_sessions: parse_var("FEED_MAX_SESSIONS", 1000)?,
            rate_limit_replenish_secs: parse_var("RATE_LIMIT_REPLENISH_SECS", 1)?,
            rate_limit_burst: parse_var("RATE_LIMIT_BURST", 20)?,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match self.backend {
            Backend::Postgres if self.database_url.is_none() => {
                return Err(ConfigError::Missing("DATABASE_URL"))
            }
            Backend::Hosted if self.hosted_db_url.is_none() => {
                return Err(ConfigError::Missing("HOSTED_DB_URL"))
            }
            _ => {}
        }
        if self.page_size == 0 {
            return Err(ConfigError::Invalid {
                name: "FEED_PAGE_SIZE",
                value: "0".to_string(),
            });
        }
        if self.max_sessions == 0 {
            return Err(ConfigError::Invalid {
                name: "FEED_MAX_SESSIONS",
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}
