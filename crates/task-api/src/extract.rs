use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use domain::UserId;

use crate::error::ApiError;
use crate::AppState;

/// The authenticated caller, taken from the `Authorization: Bearer` header.
pub struct AuthUser {
    pub user_id: UserId,
    pub email: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Not authorized, no token".to_string()))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::Unauthorized("Not authorized, no token".to_string()))?;

        let claims = state.tokens.verify(token)?;

        Ok(AuthUser {
            user_id: UserId::from_string(claims.sub),
            email: claims.email,
        })
    }
}
