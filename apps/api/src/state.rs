use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::SessionStore;
use crate::roadmap::{AssetStore, RoadmapCatalog};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Session and reset tokens. Default: Redis.
    pub sessions: Arc<dyn SessionStore>,
    /// Where skill images live. Local directory, or S3 when `S3_BUCKET` is set.
    pub assets: Arc<dyn AssetStore>,
    /// Role → skills and skill → image tables, loaded once at startup.
    pub catalog: Arc<RoadmapCatalog>,
}
