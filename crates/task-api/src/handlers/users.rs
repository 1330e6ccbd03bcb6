use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tracing::info;

use domain::User;
use shared::password;

use crate::error::ApiError;
use crate::extract::AuthUser;
use crate::models::{AuthResponse, LoginRequest, ProfileResponse, RegisterRequest};
use crate::AppState;

const MIN_PASSWORD_LEN: usize = 6;

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::BadRequest(
            "Password must be at least 6 characters".to_string(),
        ));
    }

    let user = User::new(&req.name, &req.email)?;
    let password_hash = password::hash_password(&req.password)?;
    state.users.create(&user, &password_hash).await?;

    let token = state.tokens.issue(&user)?;
    info!(user_id = %user.id, "User registered");

    Ok((StatusCode::CREATED, Json(AuthResponse::new(&user, token))))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let email = req.email.trim().to_ascii_lowercase();

    // Unknown address and wrong password answer identically
    let Some(record) = state.users.find_by_email(&email).await? else {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    };
    if !password::verify_password(&req.password, &record.password_hash)? {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    let token = state.tokens.issue(&record.user)?;
    info!(user_id = %record.user.id, "User logged in");

    Ok(Json(AuthResponse::new(&record.user, token)))
}

pub async fn profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .users
        .find_by_id(&auth.user_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(ProfileResponse::from(&user)))
}
