//! User endpoints
//!
//! Handlers validate and coerce the request into typed objects (unknown
//! fields are ignored), invoke the service, and serialize responses.
//! Everything the client sees on failure goes through `ApiError`.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::state::AppState;
use crate::api::types::{ApiError, Json, PageParams, bool_param};
use crate::domain::user::User;
use crate::infrastructure::user::{CreateUser, UpdateUser};

/// Request to create a user. Fields are optional at the wire level; the
/// service enforces which are required, so a missing field and an empty
/// field produce the same business error.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserApiRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Partial update request; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserApiRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// User as returned to clients. There is no password field of any kind.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            email: user.email().to_string(),
            first_name: user.first_name().to_string(),
            last_name: user.last_name().to_string(),
            is_active: user.is_active(),
            created_at: user.created_at().to_rfc3339(),
            updated_at: user.updated_at().to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ListUsersResponse {
    pub items: Vec<UserResponse>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserApiRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    debug!("creating user");

    let user = state
        .user_service
        .create_user(CreateUser {
            email: request.email.unwrap_or_default(),
            first_name: request.first_name.unwrap_or_default(),
            last_name: request.last_name.unwrap_or_default(),
            password: request.password.unwrap_or_default(),
            is_active: request.is_active.unwrap_or(true),
        })
        .await
        .map_err(ApiError::from)?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// GET /users/{user_id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    debug!(user_id = %user_id, "getting user");

    let user = state
        .user_service
        .get_user(&user_id)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(UserResponse::from(&user)))
}

/// GET /users?limit&offset&is_active
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<ListUsersResponse>, ApiError> {
    let page = PageParams::from_query(&query);
    let is_active = bool_param(&query, "is_active");

    debug!(limit = page.limit, offset = page.offset, "listing users");

    let users = state
        .user_service
        .list_users(page.limit, page.offset, is_active)
        .await
        .map_err(ApiError::from)?;

    let total = state
        .user_service
        .count_users(is_active)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(ListUsersResponse {
        items: users.iter().map(UserResponse::from).collect(),
        total,
        limit: page.limit,
        offset: page.offset,
    }))
}

/// PUT/PATCH /users/{user_id}
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<UpdateUserApiRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    debug!(user_id = %user_id, "updating user");

    let user = state
        .user_service
        .update_user(
            &user_id,
            UpdateUser {
                email: request.email,
                first_name: request.first_name,
                last_name: request.last_name,
                password: request.password,
                is_active: request.is_active,
            },
        )
        .await
        .map_err(ApiError::from)?;

    Ok(Json(UserResponse::from(&user)))
}

/// DELETE /users/{user_id}
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    debug!(user_id = %user_id, "deleting user");

    state
        .user_service
        .delete_user(&user_id)
        .await
        .map_err(ApiError::from)?;

    Ok(StatusCode::NO_CONTENT)
}
