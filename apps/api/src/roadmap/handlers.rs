//! Axum route handlers for the roadmap view and its PDF download.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::profile::store::fetch_selected_role;
use crate::render::builder::RoadmapDocument;
use crate::render::generate_roadmap_document;
use crate::roadmap::assets::{resolve_skill_assets, AssetStore};
use crate::roadmap::catalog::RoadmapCatalog;
use crate::roadmap::filename::{attachment_disposition, derive_filename};
use crate::state::AppState;

pub const DOWNLOAD_PATH: &str = "/api/v1/roadmap/download";

#[derive(Debug, Serialize)]
pub struct RoadmapResponse {
    pub role: String,
    pub skills: Vec<String>,
    pub download_url: String,
    pub filename: String,
}

/// Wraps PDF bytes as a download named after the role.
pub fn pdf_attachment(role: &str, pdf: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, attachment_disposition(role)),
        ],
        pdf,
    )
        .into_response()
}

/// GET /api/v1/roadmap
pub async fn handle_get_roadmap(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<RoadmapResponse>, AppError> {
    let role = fetch_selected_role(&state.db, current.user_id)
        .await?
        .ok_or(AppError::RoleNotSelected)?;
    let skills = state.catalog.skills_for_role(&role).to_vec();

    Ok(Json(RoadmapResponse {
        filename: derive_filename(&role),
        role,
        skills,
        download_url: DOWNLOAD_PATH.to_string(),
    }))
}

/// Builds the roadmap PDF for `role` from the catalog and asset store.
///
/// Asset bytes are fetched on the async side; PDF assembly runs on the
/// blocking pool. A storage failure other than a missing file, or any
/// generation failure, fails the whole document.
pub async fn render_roadmap(
    catalog: &RoadmapCatalog,
    assets: &dyn AssetStore,
    role: &str,
) -> Result<RoadmapDocument, AppError> {
    let skills = catalog.skills_for_role(role).to_vec();

    let resolved = resolve_skill_assets(catalog, assets, &skills)
        .await
        .map_err(|e| AppError::Storage(format!("{e:#}")))?;

    let build_role = role.to_string();
    let document = tokio::task::spawn_blocking(move || {
        generate_roadmap_document(&build_role, &skills, &resolved)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("Roadmap render task failed: {e}")))??;

    Ok(document)
}

/// GET /api/v1/roadmap/download
pub async fn handle_download_roadmap(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Response, AppError> {
    let role = fetch_selected_role(&state.db, current.user_id)
        .await?
        .ok_or(AppError::RoleNotSelected)?;

    let document = render_roadmap(&state.catalog, state.assets.as_ref(), &role).await?;

    info!(
        user_id = %current.user_id,
        role = %role,
        pages = document.page_count,
        bytes = document.bytes.len(),
        "Generated roadmap PDF"
    );

    Ok(pdf_attachment(&role, document.bytes))
}
