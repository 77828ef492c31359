use std::path::PathBuf;
use std::time::Duration;

use super::error::Result;
use crate::auth::JwtConfig;

const DB_FILE: &str = "pos.redb";

/// Server configuration
///
/// # Environment
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | ./data | directory holding `pos.redb` |
/// | HTTP_PORT | 8001 | listen port |
/// | ENVIRONMENT | development | `production` requires JWT_SECRET |
/// | REQUEST_TIMEOUT_MS | 30000 | per-request timeout |
/// | STORE_TIMEOUT_MS | 5000 | bound on each store operation |
/// | JWT_SECRET | generated (dev only) | HS256 key, ≥ 32 chars |
/// | JWT_EXPIRATION_MINUTES | 10080 | token lifetime |
/// | JWT_ISSUER / JWT_AUDIENCE | pos-server / pos-clients | token claims |
/// | ADMIN_USERNAME | admin | bootstrap admin name |
/// | ADMIN_PASSWORD | unset | bootstrap admin created only when set |
/// | RESTAURANT_NAME | Restaurant | receipt and report header |
/// | SEED_DEMO_DATA | false | seed menu, tables and couriers on an empty store |
/// | LOG_DIR | unset | daily rolling log files |
///
/// ```ignore
/// WORK_DIR=/srv/pos HTTP_PORT=8080 ADMIN_PASSWORD=changeme pos-server
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: String,
    pub http_port: u16,
    /// development | staging | production
    pub environment: String,
    pub request_timeout_ms: u64,
    pub store_timeout_ms: u64,
    pub jwt: JwtConfig,
    pub admin_username: String,
    pub admin_password: Option<String>,
    pub restaurant_name: String,
    pub seed_demo_data: bool,
    pub log_dir: Option<String>,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Defaults for everything except the JWT settings
    pub fn with_jwt(jwt: JwtConfig) -> Self {
        Self {
            work_dir: "./data".to_string(),
            http_port: 8001,
            environment: "development".to_string(),
            request_timeout_ms: 30_000,
            store_timeout_ms: 5_000,
            jwt,
            admin_username: "admin".to_string(),
            admin_password: None,
            restaurant_name: "Restaurant".to_string(),
            seed_demo_data: false,
            log_dir: None,
        }
    }

    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Result<Self> {
        let environment = env_or("ENVIRONMENT", "development".to_string());
        let jwt = JwtConfig::from_env(environment == "production")?;
        let defaults = Self::with_jwt(jwt);

        Ok(Self {
            work_dir: env_or("WORK_DIR", defaults.work_dir),
            http_port: env_or("HTTP_PORT", defaults.http_port),
            environment,
            request_timeout_ms: env_or("REQUEST_TIMEOUT_MS", defaults.request_timeout_ms),
            store_timeout_ms: env_or("STORE_TIMEOUT_MS", defaults.store_timeout_ms),
            jwt: defaults.jwt,
            admin_username: env_or("ADMIN_USERNAME", defaults.admin_username),
            admin_password: env_opt("ADMIN_PASSWORD"),
            restaurant_name: env_or("RESTAURANT_NAME", defaults.restaurant_name),
            seed_demo_data: env_or("SEED_DEMO_DATA", defaults.seed_demo_data),
            log_dir: env_opt("LOG_DIR"),
        })
    }

    /// Override the work dir and port, mostly for tests
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Result<Self> {
        let mut config = Self::from_env()?;
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        Ok(config)
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn db_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join(DB_FILE)
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
