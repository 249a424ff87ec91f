use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub nats_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub feed_service_url: String,
    /// Per-call deadline for the background feed warm-up.
    pub feed_timeout: Duration,
    pub request_timeout: Duration,
    pub saga_handler_timeout: Duration,
    pub db_max_connections: u32,
    pub recommendation_two_hop_limit: usize,
    /// Empty means any origin.
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            nats_url: env::var("NATS_URL").unwrap_or_else(|_| "nats://localhost:4222".to_string()),
            port: parse_var("PORT", 8000)?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "twitter-clone".to_string()),
            feed_service_url: env::var("FEED_SERVICE_URL")
                .unwrap_or_else(|_| "http://tweet:9001".to_string()),
            feed_timeout: Duration::from_secs(parse_var("FEED_TIMEOUT_SECS", 5)?),
            request_timeout: Duration::from_secs(parse_var("REQUEST_TIMEOUT_SECS", 30)?),
            saga_handler_timeout: Duration::from_secs(parse_var("SAGA_HANDLER_TIMEOUT_SECS", 10)?),
            db_max_connections: parse_var("DB_MAX_CONNECTIONS", 10)?,
            recommendation_two_hop_limit: parse_var("RECOMMENDATION_TWO_HOP_LIMIT", 50)?,
            allowed_origins: parse_origins(&env::var("ALLOWED_ORIGINS").unwrap_or_default()),
        })
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a valid number", name)),
        Err(_) => Ok(default),
    }
}

/// Comma separated origins; `*` (or nothing) allows any.
fn parse_origins(raw: &str) -> Vec<String> {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect();

    if origins.iter().any(|o| o == "*") {
        Vec::new()
    } else {
        origins
    }
}
