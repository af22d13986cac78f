// src/config.rs
use chrono::TimeDelta;
use std::path::PathBuf;

pub const DEFAULT_UPSTREAM_URL: &str = "https://api.apify.com/v2/datasets/jTMxakh4vuvXiMo8J/items";

/// Runtime settings, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub upstream_url: String,
    /// `None` keeps the snapshot in process memory only.
    pub snapshot_path: Option<PathBuf>,
    pub snapshot_max_age_hours: i64,
    pub http_timeout_secs: u64,
    pub neighborhood_table: PathBuf,
    pub database_path: String,
    pub schema_path: String,
    pub bind_addr: String,
    pub max_workers: usize,
    pub bootstrap: Option<BootstrapAccount>,
}

/// Account created at startup so a fresh install has someone who can sign in.
#[derive(Debug, Clone)]
pub struct BootstrapAccount {
    pub email: String,
    pub password: String,
    pub role: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            snapshot_path: Some(PathBuf::from("listings_snapshot.json")),
            snapshot_max_age_hours: 24,
            http_timeout_secs: 60,
            neighborhood_table: PathBuf::from("neighborhoods.csv"),
            database_path: "apartments.sqlite3".to_string(),
            schema_path: "sql/schema.sql".to_string(),
            bind_addr: "127.0.0.1:3000".to_string(),
            max_workers: 8,
            bootstrap: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; unparseable numbers keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let snapshot_path = match lookup("SNAPSHOT_PATH") {
            Some(p) if p.trim().is_empty() => None,
            Some(p) => Some(PathBuf::from(p)),
            None => defaults.snapshot_path,
        };

        let bootstrap = match (lookup("BOOTSTRAP_EMAIL"), lookup("BOOTSTRAP_PASSWORD")) {
            (Some(email), Some(password)) if !email.trim().is_empty() && !password.is_empty() => {
                Some(BootstrapAccount {
                    email,
                    password,
                    role: lookup("BOOTSTRAP_ROLE").filter(|r| !r.trim().is_empty()),
                })
            }
            _ => None,
        };

        Self {
            upstream_url: lookup("UPSTREAM_URL").unwrap_or(defaults.upstream_url),
            snapshot_path,
            snapshot_max_age_hours: lookup("SNAPSHOT_MAX_AGE_HOURS")
                .and_then(|v| v.parse().ok())
                .filter(|h: &i64| *h > 0 && TimeDelta::try_hours(*h).is_some())
                .unwrap_or(defaults.snapshot_max_age_hours),
            http_timeout_secs: lookup("HTTP_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.http_timeout_secs),
            neighborhood_table: lookup("NEIGHBORHOOD_TABLE")
                .map(PathBuf::from)
                .unwrap_or(defaults.neighborhood_table),
            database_path: lookup("DATABASE_PATH").unwrap_or(defaults.database_path),
            schema_path: lookup("SCHEMA_PATH").unwrap_or(defaults.schema_path),
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            max_workers: lookup("MAX_WORKERS")
                .and_then(|v| v.parse().ok())
                .filter(|n: &usize| *n > 0)
                .unwrap_or(defaults.max_workers),
            bootstrap,
        }
    }

    /// Snapshot freshness window. Hour counts chrono cannot represent fall back to 24h.
    pub fn snapshot_max_age(&self) -> TimeDelta {
        TimeDelta::try_hours(self.snapshot_max_age_hours)
            .filter(|age| *age > TimeDelta::zero())
            .unwrap_or_else(|| TimeDelta::hours(24))
    }
}
