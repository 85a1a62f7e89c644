//! Service routes

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use cinelog_db::Service;
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

use super::TOTAL_COUNT_HEADER;
use super::auth::ActiveUser;
use super::types::{Pagination, ServiceListResponse, ServiceRequest};
use super::validation::validate_text;

fn service_not_found() -> ApiError {
    ApiError::NotFound("Service not found".to_string())
}

/// GET /api/v1/services
async fn list_services(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state.db.list_services(page.offset, page.limit).await?;

    Ok((
        [(TOTAL_COUNT_HEADER, page.total.to_string())],
        Json(ServiceListResponse {
            services: page.items,
            count: page.total,
        }),
    ))
}

/// GET /api/v1/services/{id}
async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Service>, ApiError> {
    let service = state.db.get_service(id).await?.ok_or_else(service_not_found)?;
    Ok(Json(service))
}

/// POST /api/v1/services
async fn create_service(
    ActiveUser(caller): ActiveUser,
    State(state): State<AppState>,
    Json(request): Json<ServiceRequest>,
) -> Result<(StatusCode, Json<Service>), ApiError> {
    validate_text("Name", &request.name)?;

    let service = state.db.insert_service(&request.name).await?;
    info!("User {} added service {}", caller.username(), service.name);

    Ok((StatusCode::CREATED, Json(service)))
}

/// PUT /api/v1/services/{id}
async fn update_service(
    ActiveUser(caller): ActiveUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<ServiceRequest>,
) -> Result<Json<Service>, ApiError> {
    validate_text("Name", &request.name)?;

    let service = state
        .db
        .update_service(id, &request.name)
        .await?
        .ok_or_else(service_not_found)?;
    info!("User {} renamed service {}", caller.username(), id);

    Ok(Json(service))
}

/// DELETE /api/v1/services/{id}
async fn delete_service(
    ActiveUser(caller): ActiveUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if !state.db.delete_service(id).await? {
        return Err(service_not_found());
    }

    info!("User {} deleted service {}", caller.username(), id);
    Ok(StatusCode::NO_CONTENT)
}

/// Create service routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/services", get(list_services).post(create_service))
        .route(
            "/api/v1/services/{id}",
            get(get_service).put(update_service).delete(delete_service),
        )
}
