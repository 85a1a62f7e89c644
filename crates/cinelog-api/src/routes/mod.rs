//! API routes

pub mod auth;
mod health;
pub mod metrics;
mod movies;
mod services;
pub mod types;
mod users;
mod validation;

use axum::Router;
use std::sync::Arc;

use crate::state::{AppState, MetricsHandle};

pub use auth::{ActiveUser, CurrentUser};

/// Response header carrying the total row count of a list query
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

/// Create the main router
pub fn create_router(state: AppState, metrics_handle: Option<Arc<MetricsHandle>>) -> Router {
    let mut router = Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(users::routes())
        .merge(movies::routes())
        .merge(services::routes())
        .with_state(state);

    if let Some(handle) = metrics_handle {
        router = router.merge(metrics::routes(handle));
    }

    router
}
