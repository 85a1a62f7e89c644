//! Cinelog REST API
//!
//! This crate provides the Axum-based HTTP API for Cinelog: token login,
//! the caller's profile, and CRUD endpoints for users, movies and services.

pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::{AppState, MetricsHandle};
