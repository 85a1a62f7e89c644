//! User routes

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use cinelog_auth::{AuthError, hash_password};
use cinelog_db::{DbError, NewUser, UpdateUser};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;

use super::TOTAL_COUNT_HEADER;
use super::auth::ActiveUser;
use super::types::{CreateUserRequest, Pagination, UpdateUserRequest, UserListResponse, UserResponse};
use super::validation::{validate_email, validate_password, validate_text, validate_username};

/// Hash a password on the blocking pool
async fn hash_blocking(password: String) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| ApiError::Internal(format!("Password hashing task failed: {}", e)))?
        .map_err(ApiError::from)
}

/// Map a username collision onto the auth taxonomy
fn duplicate_as_auth_error(err: DbError) -> ApiError {
    match err {
        DbError::Duplicate(_) => AuthError::DuplicateUsername.into(),
        other => other.into(),
    }
}

// ==================== User Routes ====================

/// GET /api/v1/users
async fn list_users(
    _caller: ActiveUser,
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state.db.list_users(page.offset, page.limit).await?;

    Ok((
        [(TOTAL_COUNT_HEADER, page.total.to_string())],
        Json(UserListResponse {
            users: page.items.into_iter().map(UserResponse::from).collect(),
            count: page.total,
        }),
    ))
}

/// POST /api/v1/users
async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    validate_username(&request.username)?;
    validate_password(&request.password)?;
    validate_email(&request.email)?;
    validate_text("Full name", &request.full_name)?;

    debug!("Registering user: {}", request.username);

    let password_hash = hash_blocking(request.password).await?;

    let user = state
        .db
        .insert_user(NewUser {
            username: request.username,
            email: request.email,
            full_name: request.full_name,
            password_hash,
            disabled: false,
        })
        .await
        .map_err(duplicate_as_auth_error)?;

    info!("Created user: {}", user.username);

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// GET /api/v1/users/{id}
async fn get_user(
    _caller: ActiveUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .db
        .get_user_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user.into()))
}

/// PUT /api/v1/users/{id}
async fn update_user(
    ActiveUser(caller): ActiveUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    caller.ensure_owns(id)?;

    if let Some(username) = &request.username {
        validate_username(username)?;
    }
    if let Some(email) = &request.email {
        validate_email(email)?;
    }
    if let Some(full_name) = &request.full_name {
        validate_text("Full name", full_name)?;
    }

    let password_hash = match request.password {
        Some(password) => {
            validate_password(&password)?;
            Some(hash_blocking(password).await?)
        }
        None => None,
    };

    debug!("Updating user: {}", id);

    let user = state
        .db
        .update_user(
            id,
            UpdateUser {
                username: request.username,
                email: request.email,
                full_name: request.full_name,
                password_hash,
                disabled: None,
            },
        )
        .await
        .map_err(duplicate_as_auth_error)?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    info!("Updated user: {}", user.username);

    Ok(Json(user.into()))
}

/// DELETE /api/v1/users/{id}
async fn delete_user(
    ActiveUser(caller): ActiveUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    caller.ensure_owns(id)?;

    debug!("Deleting user: {}", id);

    if state.db.delete_user(id).await? {
        info!("Deleted user: {}", caller.username());
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("User not found".to_string()))
    }
}

/// Create user routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/users", get(list_users).post(create_user))
        .route(
            "/api/v1/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
}
