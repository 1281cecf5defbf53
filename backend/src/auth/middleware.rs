//! Authenticated user extractor
//!
//! Uses the pre-computed verifier from AppState.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::FromRef,
    http::{header::AUTHORIZATION, request::Parts},
};
use uuid::Uuid;

/// Authenticated user extracted from a bearer JWT
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::Unauthorized("Invalid authorization format".to_string()))?;

        let claims = app_state
            .jwt()
            .verify(token)
            .map_err(|e| ApiError::Unauthorized(e.to_string()))?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| ApiError::Unauthorized("Invalid user ID in token".to_string()))?;

        Ok(AuthUser { user_id })
    }
}
