use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use mongodb::bson::oid::ObjectId;
use serde_json::{json, Value};
use tracing::{error, info};

use crate::{
    auth::{password::hash_password, AuthUser},
    db::Pagination,
    error::{ApiError, ApiResult},
    extractors::{ApiJson, ApiQuery},
    models::{
        user_model::{CreateUserParams, UpdateUserParams, User, UserResponse},
        ResourceResponse,
    },
    state::AppState,
    utils::parse_object_id,
};

fn ensure_self_or_admin(caller: &AuthUser, user_id: ObjectId) -> ApiResult<()> {
    if caller.is_admin || caller.id == user_id {
        Ok(())
    } else {
        Err(ApiError::Unauthorized)
    }
}

pub async fn add_user(
    State(state): State<AppState>,
    ApiJson(params): ApiJson<CreateUserParams>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let errors = params.validate();
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    if state.store.user.get_user_by_email(&params.email).await?.is_some() {
        return Err(ApiError::BadRequest(format!(
            "email {} is already registered",
            params.email
        )));
    }

    let encrypted_password = hash_password(&params.password).map_err(|e| {
        error!("Failed to hash password: {}", e);
        ApiError::Internal
    })?;

    let user = state
        .store
        .user
        .insert_user(User {
            id: None,
            first_name: params.first_name,
            last_name: params.last_name,
            email: params.email,
            encrypted_password,
            is_admin: false,
        })
        .await?;

    info!(email = %user.email, "User created");
    Ok((StatusCode::CREATED, Json(user.into())))
}

pub async fn load_users(
    State(state): State<AppState>,
    ApiQuery(pagination): ApiQuery<Pagination>,
) -> ApiResult<Json<ResourceResponse<UserResponse>>> {
    let users = state.store.user.list_users(pagination).await?;
    Ok(Json(ResourceResponse::new(
        users.into_iter().map(UserResponse::from).collect(),
        pagination.page(),
    )))
}

pub async fn load_user(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> ApiResult<Json<UserResponse>> {
    let user_id = parse_object_id(&id_str)?;
    let user = state
        .store
        .user
        .get_user_by_id(user_id)
        .await?
        .ok_or(ApiError::NotFound("user"))?;

    Ok(Json(user.into()))
}

pub async fn update_user(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id_str): Path<String>,
    ApiJson(params): ApiJson<UpdateUserParams>,
) -> ApiResult<Json<Value>> {
    let user_id = parse_object_id(&id_str)?;
    ensure_self_or_admin(&caller, user_id)?;

    if !state.store.user.update_user(user_id, &params).await? {
        return Err(ApiError::NotFound("user"));
    }

    Ok(Json(json!({ "updated": id_str })))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id_str): Path<String>,
) -> ApiResult<Json<Value>> {
    let user_id = parse_object_id(&id_str)?;
    ensure_self_or_admin(&caller, user_id)?;

    if !state.store.user.delete_user(user_id).await? {
        return Err(ApiError::NotFound("user"));
    }

    info!(user = %user_id, by = %caller.id, "User deleted");
    Ok(Json(json!({ "deleted": id_str })))
}
