mod auth;
mod config;
mod db;
mod errors;
mod models;
mod profile;
mod render;
mod roadmap;
mod routes;
mod state;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::auth::{RedisSessionStore, SessionStore};
use crate::config::{Config, S3Config};
use crate::db::{create_pool, ensure_schema};
use crate::roadmap::{AssetStore, FsAssetStore, RoadmapCatalog, S3AssetStore};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Carvia v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    ensure_schema(&db).await?;

    // Initialize Redis-backed sessions
    let redis = redis::Client::open(config.redis_url.clone())?;
    let sessions: Arc<dyn SessionStore> =
        Arc::new(RedisSessionStore::connect(&redis, config.session_ttl_secs).await?);
    info!("Redis session store connected");

    // Roadmap catalog (built-in unless a JSON file overrides it)
    let catalog = match &config.catalog_path {
        Some(path) => RoadmapCatalog::from_json_file(path)?,
        None => RoadmapCatalog::builtin(),
    };
    info!("Roadmap catalog loaded: {} roles", catalog.roles().len());

    // Skill image store
    let assets: Arc<dyn AssetStore> = match &config.s3 {
        Some(s3) => {
            let client = build_s3_client(s3).await;
            info!("Skill images served from s3://{}/{}", s3.bucket, s3.asset_prefix);
            Arc::new(S3AssetStore::new(
                client,
                s3.bucket.clone(),
                s3.asset_prefix.clone(),
            ))
        }
        None => {
            info!("Skill images served from {}", config.assets_dir.display());
            Arc::new(FsAssetStore::new(config.assets_dir.clone()))
        }
    };

    // Build app state
    let state = AppState {
        db,
        sessions,
        assets,
        catalog: Arc::new(catalog),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS to the frontend origin once it has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client for MinIO (local, with endpoint) or AWS (default chain).
async fn build_s3_client(s3: &S3Config) -> aws_sdk_s3::Client {
    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new(s3.region.clone()));

    if let (Some(key_id), Some(secret)) = (&s3.access_key_id, &s3.secret_access_key) {
        loader = loader.credentials_provider(Credentials::new(
            key_id,
            secret,
            None,
            None,
            "carvia-static",
        ));
    }
    if let Some(endpoint) = &s3.endpoint {
        loader = loader.endpoint_url(endpoint);
    }
    let shared = loader.load().await;

    // MinIO serves buckets as path segments, not subdomains.
    let s3_config = aws_sdk_s3::config::Builder::from(&shared)
        .force_path_style(s3.endpoint.is_some())
        .build();
    aws_sdk_s3::Client::from_conf(s3_config)
}
