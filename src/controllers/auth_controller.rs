use axum::{extract::State, response::Json};
use tracing::{error, info};

use crate::{
    auth::password::verify_password,
    error::{ApiError, ApiResult},
    extractors::ApiJson,
    models::user_model::{AuthParams, AuthResponse},
    state::AppState,
};

pub async fn authenticate(
    State(state): State<AppState>,
    ApiJson(params): ApiJson<AuthParams>,
) -> ApiResult<Json<AuthResponse>> {
    let user = state
        .store
        .user
        .get_user_by_email(&params.email)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    if !verify_password(&user.encrypted_password, &params.password) {
        return Err(ApiError::InvalidCredentials);
    }

    let user_id = user.id.ok_or(ApiError::Internal)?;
    let token = state.jwt.generate_token(user_id, &user.email).map_err(|e| {
        error!("Failed to sign token: {}", e);
        ApiError::Internal
    })?;

    info!(user = %user_id, "User authenticated");

    Ok(Json(AuthResponse {
        user: user.into(),
        token,
    }))
}
