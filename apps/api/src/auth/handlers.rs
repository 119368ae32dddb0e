//! Axum route handlers for account management.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::extractor::CurrentUser;
use crate::auth::password::{hash_password_off_thread, verify_password_off_thread};
use crate::auth::session::SessionStore;
use crate::auth::store;
use crate::errors::AppError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user_id: Uuid,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user_id: Uuid,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct ForgotPasswordResponse {
    pub reset_token: String,
    pub expires_in_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub reset_token: String,
    pub password: String,
    pub confirm: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Validation
// ────────────────────────────────────────────────────────────────────────────

/// Emails are compared case-insensitively and without surrounding whitespace.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_new_password(password: &str, confirm: &str) -> Result<(), AppError> {
    if password.is_empty() {
        return Err(AppError::Validation("Password cannot be empty.".to_string()));
    }
    if password != confirm {
        return Err(AppError::Validation("Passwords do not match.".to_string()));
    }
    Ok(())
}

fn validate_registration(req: &RegisterRequest) -> Result<(), AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::Validation("Name cannot be empty.".to_string()));
    }
    let email = normalize_email(&req.email);
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Validation("Enter a valid email address.".to_string()));
    }
    validate_new_password(&req.password, &req.confirm)
}

fn session_error(e: anyhow::Error) -> AppError {
    AppError::Session(format!("{e:#}"))
}

/// Hashes the new password, then redeems the reset token.
///
/// The token is consumed only after hashing succeeds.
async fn redeem_reset_token(
    sessions: &dyn SessionStore,
    reset_token: &str,
    password: String,
) -> Result<(Uuid, String), AppError> {
    let hashed = hash_password_off_thread(password).await?;
    let user_id = sessions
        .consume_reset_token(reset_token.trim())
        .await
        .map_err(session_error)?
        .ok_or(AppError::Unauthorized)?;
    Ok((user_id, hashed))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    validate_registration(&req)?;
    let email = normalize_email(&req.email);

    if store::email_exists(&state.db, &email).await? {
        return Err(AppError::Conflict("Email already exists.".to_string()));
    }

    let hashed = hash_password_off_thread(req.password).await?;
    let user_id = store::create_user_with_profile(&state.db, req.name.trim(), &email, &hashed)
        .await
        .map_err(|e| {
            // Lost a race with a concurrent registration for the same email.
            if store::is_unique_violation(&e) {
                AppError::Conflict("Email already exists.".to_string())
            } else {
                AppError::Database(e)
            }
        })?;

    info!("Registered user {user_id}");
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user_id,
            message: "Registration successful. Please login.".to_string(),
        }),
    ))
}

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let email = normalize_email(&req.email);
    let user = store::find_user_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| {
            AppError::InvalidCredentials("Email not registered. Please sign up.".to_string())
        })?;

    if !verify_password_off_thread(req.password, user.password.clone()).await? {
        warn!("Failed login for user {}", user.id);
        return Err(AppError::InvalidCredentials("Incorrect password.".to_string()));
    }

    let token = state
        .sessions
        .create_session(user.id)
        .await
        .map_err(session_error)?;
    info!("User {} logged in", user.id);

    Ok(Json(LoginResponse {
        token,
        user_id: user.id,
        name: user.name,
    }))
}

/// POST /api/v1/auth/logout
pub async fn handle_logout(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<StatusCode, AppError> {
    state
        .sessions
        .destroy_session(&current.token)
        .await
        .map_err(session_error)?;
    info!("User {} logged out", current.user_id);
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/auth/forgot-password
///
/// Issues a single-use reset token for a registered email.
///
/// The token is returned in the response body so a trusted frontend can
/// deliver it out of band (email link). It grants a password change to
/// whoever holds it, so it must never be shown to the requester directly.
pub async fn handle_forgot_password(
    State(state): State<AppState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> Result<Json<ForgotPasswordResponse>, AppError> {
    let email = normalize_email(&req.email);
    let user = store::find_user_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| AppError::NotFound("Email not registered.".to_string()))?;

    let reset_token = state
        .sessions
        .create_reset_token(user.id)
        .await
        .map_err(session_error)?;
    info!("Issued password reset token for user {}", user.id);

    Ok(Json(ForgotPasswordResponse {
        reset_token,
        expires_in_secs: crate::auth::session::RESET_TOKEN_TTL_SECS,
    }))
}

/// POST /api/v1/auth/reset-password
pub async fn handle_reset_password(
    State(state): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<StatusCode, AppError> {
    validate_new_password(&req.password, &req.confirm)?;

    let (user_id, hashed) =
        redeem_reset_token(state.sessions.as_ref(), &req.reset_token, req.password).await?;
    if !store::update_password(&state.db, user_id, &hashed).await? {
        return Err(AppError::NotFound(format!("User {user_id} not found")));
    }

    let revoked = state
        .sessions
        .revoke_user_sessions(user_id)
        .await
        .map_err(session_error)?;
    info!("Revoked {revoked} session(s) for user {user_id} after password reset");
    info!("Password reset for user {user_id}");
    Ok(StatusCode::NO_CONTENT)
}
