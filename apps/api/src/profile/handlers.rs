//! Axum route handlers for onboarding (skills → role) and the dashboard.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::store::find_user_by_id;
use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::models::profile::Profile;
use crate::profile::skills::{encode_skills, normalize_skills, parse_skills};
use crate::profile::store;
use crate::roadmap::catalog::RoleTrack;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Where the onboarding flow sends the user next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStep {
    Skills,
    Roles,
    Roadmap,
}

#[derive(Debug, Serialize)]
pub struct OnboardingResponse {
    pub name: String,
    pub has_skills: bool,
    pub has_role: bool,
    pub next_step: OnboardingStep,
}

#[derive(Debug, Serialize)]
pub struct SkillsResponse {
    /// Skills the roadmap catalog knows about, for the picker.
    pub available: Vec<String>,
    /// Skills the user reported.
    pub selected: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SaveSkillsRequest {
    pub skills: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RolesResponse {
    pub roles: Vec<RoleTrack>,
}

#[derive(Debug, Deserialize)]
pub struct SaveRoleRequest {
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub name: String,
    pub role: Option<String>,
    pub user_skills: Vec<String>,
    pub roadmap_skills: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

pub fn next_step(has_skills: bool, has_role: bool) -> OnboardingStep {
    match (has_skills, has_role) {
        (_, true) => OnboardingStep::Roadmap,
        (false, false) => OnboardingStep::Skills,
        (true, false) => OnboardingStep::Roles,
    }
}

fn user_skills(profile: Option<&Profile>) -> Vec<String> {
    parse_skills(profile.and_then(|p| p.skills.as_deref()))
}

async fn user_name(state: &AppState, current: &CurrentUser) -> Result<String, AppError> {
    // A live session for a deleted account is treated as signed out.
    find_user_by_id(&state.db, current.user_id)
        .await?
        .map(|u| u.name)
        .ok_or(AppError::Unauthorized)
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/onboarding
pub async fn handle_onboarding(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<OnboardingResponse>, AppError> {
    let name = user_name(&state, &current).await?;
    let profile = store::fetch_profile(&state.db, current.user_id).await?;

    let has_skills = !user_skills(profile.as_ref()).is_empty();
    let has_role = profile.as_ref().and_then(Profile::selected_role).is_some();

    Ok(Json(OnboardingResponse {
        name,
        has_skills,
        has_role,
        next_step: next_step(has_skills, has_role),
    }))
}

/// GET /api/v1/skills
pub async fn handle_get_skills(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<SkillsResponse>, AppError> {
    let profile = store::fetch_profile(&state.db, current.user_id).await?;
    Ok(Json(SkillsResponse {
        available: state
            .catalog
            .skill_names()
            .into_iter()
            .map(str::to_string)
            .collect(),
        selected: user_skills(profile.as_ref()),
    }))
}

/// POST /api/v1/skills
pub async fn handle_save_skills(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(req): Json<SaveSkillsRequest>,
) -> Result<Json<SkillsResponse>, AppError> {
    let skills = normalize_skills(&req.skills);
    store::save_skills(&state.db, current.user_id, &encode_skills(&skills)).await?;
    info!("User {} saved {} skills", current.user_id, skills.len());

    Ok(Json(SkillsResponse {
        available: state
            .catalog
            .skill_names()
            .into_iter()
            .map(str::to_string)
            .collect(),
        selected: skills,
    }))
}

/// GET /api/v1/roles
///
/// Public: the role picker can render before sign-in.
pub async fn handle_list_roles(State(state): State<AppState>) -> Json<RolesResponse> {
    Json(RolesResponse {
        roles: state.catalog.roles().to_vec(),
    })
}

/// POST /api/v1/roles
///
/// Any non-empty role is accepted; roles outside the catalog simply produce
/// an empty roadmap.
pub async fn handle_save_role(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(req): Json<SaveRoleRequest>,
) -> Result<StatusCode, AppError> {
    let role = req.role.trim();
    if role.is_empty() {
        return Err(AppError::Validation("Choose a role.".to_string()));
    }
    store::save_role(&state.db, current.user_id, role).await?;
    info!("User {} selected role '{role}'", current.user_id);
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/dashboard
pub async fn handle_dashboard(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<DashboardResponse>, AppError> {
    let name = user_name(&state, &current).await?;
    let profile = store::fetch_profile(&state.db, current.user_id).await?;

    let role = profile
        .as_ref()
        .and_then(Profile::selected_role)
        .map(str::to_string);
    let roadmap_skills = role
        .as_deref()
        .map(|r| state.catalog.skills_for_role(r).to_vec())
        .unwrap_or_default();

    Ok(Json(DashboardResponse {
        name,
        role,
        user_skills: user_skills(profile.as_ref()),
        roadmap_skills,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_step() {
        assert_eq!(next_step(false, false), OnboardingStep::Skills);
        assert_eq!(next_step(true, false), OnboardingStep::Roles);
        assert_eq!(next_step(true, true), OnboardingStep::Roadmap);
        // Skipping the skills form doesn't block the roadmap.
        assert_eq!(next_step(false, true), OnboardingStep::Roadmap);
    }

    #[test]
    fn test_user_skills_without_profile_is_empty() {
        assert!(user_skills(None).is_empty());
    }

    #[test]
    fn test_step_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(OnboardingStep::Roadmap).unwrap(),
            serde_json::json!("roadmap")
        );
    }
}
