use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub port: u16,
    pub rust_log: String,
    pub session_ttl_secs: u64,
    /// Local directory holding skill images (used when no S3 bucket is configured).
    pub assets_dir: PathBuf,
    /// Optional JSON file replacing the built-in roadmap catalog.
    pub catalog_path: Option<PathBuf>,
    pub s3: Option<S3Config>,
}

/// Present only when `S3_BUCKET` is set; skill images are then read from the bucket.
#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    pub endpoint: Option<String>,
    pub region: String,
    pub asset_prefix: String,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: require_env("REDIS_URL")?,
            port: optional_env("PORT")
                .unwrap_or_else(|| "10000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            session_ttl_secs: optional_env("SESSION_TTL_SECS")
                .unwrap_or_else(|| "86400".to_string())
                .parse::<u64>()
                .context("SESSION_TTL_SECS must be a whole number of seconds")?,
            assets_dir: optional_env("ROADMAP_ASSETS_DIR")
                .unwrap_or_else(|| "static/roadmaps".to_string())
                .into(),
            catalog_path: optional_env("ROADMAP_CATALOG_PATH").map(PathBuf::from),
            s3: S3Config::from_env(),
        })
    }
}

impl S3Config {
    fn from_env() -> Option<Self> {
        let bucket = optional_env("S3_BUCKET")?;
        Some(S3Config {
            bucket,
            endpoint: optional_env("S3_ENDPOINT"),
            region: optional_env("S3_REGION").unwrap_or_else(|| "us-east-1".to_string()),
            asset_prefix: optional_env("S3_ASSET_PREFIX").unwrap_or_else(|| "roadmaps/".to_string()),
            access_key_id: optional_env("AWS_ACCESS_KEY_ID"),
            secret_access_key: optional_env("AWS_SECRET_ACCESS_KEY"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Unset and empty are treated the same.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
