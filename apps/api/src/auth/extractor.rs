use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::auth::session::bearer_token;
use crate::errors::AppError;
use crate::state::AppState;

/// The signed-in user for this request, resolved from the bearer token.
///
/// Handlers that take `CurrentUser` reject anonymous requests with 401.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: Uuid,
    pub token: String,
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let token = bearer_token(&parts.headers).ok_or(AppError::Unauthorized)?;
        let user_id = state
            .sessions
            .session_user(token)
            .await
            .map_err(|e| AppError::Session(format!("{e:#}")))?
            .ok_or(AppError::Unauthorized)?;

        Ok(CurrentUser {
            user_id,
            token: token.to_string(),
        })
    }
}
