//! Movie routes

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use cinelog_auth::AuthUser;
use cinelog_db::{Movie, MovieFilter, NewMovie};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;

use super::TOTAL_COUNT_HEADER;
use super::auth::ActiveUser;
use super::types::{MovieListResponse, MovieRequest, Pagination};
use super::validation::validate_text;

async fn movie_page(
    state: &AppState,
    filter: MovieFilter,
    page: Pagination,
) -> Result<([(&'static str, String); 1], Json<MovieListResponse>), ApiError> {
    let page = state.db.list_movies(filter, page.offset, page.limit).await?;

    Ok((
        [(TOTAL_COUNT_HEADER, page.total.to_string())],
        Json(MovieListResponse {
            movies: page.items,
            count: page.total,
        }),
    ))
}

/// Validate a movie body and settle its owner
///
/// Movies without an explicit `user_id` belong to the caller; naming
/// any other account is refused.
fn owned_movie(caller: &AuthUser, request: MovieRequest) -> Result<NewMovie, ApiError> {
    validate_text("Name", &request.name)?;
    validate_text("Quality", &request.quality)?;

    let owner = request.user_id.unwrap_or(caller.id());
    caller.ensure_owns(owner)?;

    Ok(NewMovie {
        name: request.name,
        alt_versions: request.alt_versions,
        quality: request.quality,
        user_id: Some(owner),
        service_id: request.service_id,
    })
}

async fn find_movie(state: &AppState, id: i64) -> Result<Movie, ApiError> {
    state
        .db
        .get_movie(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Movie not found".to_string()))
}

// ==================== Movie Routes ====================

/// GET /api/v1/movies
async fn list_movies(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> Result<impl IntoResponse, ApiError> {
    movie_page(&state, MovieFilter::All, page).await
}

/// GET /api/v1/movies/user/{user_id}
async fn list_movies_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(page): Query<Pagination>,
) -> Result<impl IntoResponse, ApiError> {
    movie_page(&state, MovieFilter::ByUser(user_id), page).await
}

/// GET /api/v1/movies/service/{service_id}
async fn list_movies_by_service(
    State(state): State<AppState>,
    Path(service_id): Path<i64>,
    Query(page): Query<Pagination>,
) -> Result<impl IntoResponse, ApiError> {
    movie_page(&state, MovieFilter::ByService(service_id), page).await
}

/// GET /api/v1/movies/{id}
async fn get_movie(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Movie>, ApiError> {
    Ok(Json(find_movie(&state, id).await?))
}

/// POST /api/v1/movies
async fn create_movie(
    ActiveUser(caller): ActiveUser,
    State(state): State<AppState>,
    Json(request): Json<MovieRequest>,
) -> Result<(StatusCode, Json<Movie>), ApiError> {
    let movie = owned_movie(&caller, request)?;

    debug!("Creating movie: {}", movie.name);
    let movie = state.db.insert_movie(movie).await?;
    info!("User {} added movie {}", caller.username(), movie.id);

    Ok((StatusCode::CREATED, Json(movie)))
}

/// PUT /api/v1/movies/{id}
async fn update_movie(
    ActiveUser(caller): ActiveUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<MovieRequest>,
) -> Result<Json<Movie>, ApiError> {
    let existing = find_movie(&state, id).await?;
    if let Some(owner) = existing.user_id {
        caller.ensure_owns(owner)?;
    }

    let movie = owned_movie(&caller, request)?;

    let movie = state
        .db
        .update_movie(id, movie)
        .await?
        .ok_or_else(|| ApiError::NotFound("Movie not found".to_string()))?;
    info!("User {} updated movie {}", caller.username(), id);

    Ok(Json(movie))
}

/// DELETE /api/v1/movies/{id}
async fn delete_movie(
    ActiveUser(caller): ActiveUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let existing = find_movie(&state, id).await?;
    if let Some(owner) = existing.user_id {
        caller.ensure_owns(owner)?;
    }

    if state.db.delete_movie(id).await? {
        info!("User {} deleted movie {}", caller.username(), id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Movie not found".to_string()))
    }
}

/// Create movie routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/movies", get(list_movies).post(create_movie))
        .route(
            "/api/v1/movies/{id}",
            get(get_movie).put(update_movie).delete(delete_movie),
        )
        .route("/api/v1/movies/user/{user_id}", get(list_movies_by_user))
        .route(
            "/api/v1/movies/service/{service_id}",
            get(list_movies_by_service),
        )
}
