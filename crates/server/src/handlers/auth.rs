use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

use studypoint_common::{
    auth::verify_password,
    errors::{AppError, Result},
};

use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

/// Exchanges admin credentials for a bearer token.
///
/// Unknown email and wrong password produce the same 401 so the
/// endpoint does not leak which admin accounts exist.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    req.validate().map_err(super::invalid)?;

    let admin = state
        .store
        .find_admin_by_email(&req.email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !verify_password(&req.password, &admin.password_hash)? {
        warn!(email = %req.email, "failed login attempt");
        return Err(AppError::InvalidCredentials);
    }

    let token = state.jwt.generate_token(admin.id, &admin.email)?;
    info!(admin_id = %admin.id, "admin logged in");

    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer",
        expires_in: state.jwt.ttl_secs(),
    }))
}
