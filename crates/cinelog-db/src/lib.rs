//! Cinelog Database Layer
//!
//! This crate provides the persistence layer for Cinelog,
//! using SQLite via sqlx for users, movies and services.

pub mod error;
pub mod models;
pub mod repository;
pub mod utils;

pub use error::DbError;
pub use models::*;
pub use repository::{Database, Page};
