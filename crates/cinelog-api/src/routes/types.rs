//! Request/Response DTOs

use cinelog_db::utils::DEFAULT_PAGE_LIMIT;
use cinelog_db::{Movie, Service, User};
use serde::{Deserialize, Serialize};

// ==================== Auth Types ====================

/// Form body of `POST /token`
#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Bearer token response
#[derive(Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

// ==================== Pagination ====================

/// Offset/limit query parameters
#[derive(Deserialize, Debug, Clone, Copy)]
pub struct Pagination {
    #[serde(default)]
    pub offset: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: default_limit(),
        }
    }
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_LIMIT
}

// ==================== User Types ====================

/// Registration request
#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password: String,
}

/// Profile update request; absent fields are left unchanged
#[derive(Deserialize, Default)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub password: Option<String>,
}

/// User response (without password)
#[derive(Serialize, Deserialize, Debug)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub disabled: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            disabled: user.disabled,
        }
    }
}

/// Paginated users response
#[derive(Serialize)]
pub struct UserListResponse {
    pub users: Vec<UserResponse>,
    pub count: i64,
}

// ==================== Movie Types ====================

/// Create/replace movie request
#[derive(Deserialize)]
pub struct MovieRequest {
    pub name: String,
    #[serde(default, alias = "altVersions")]
    pub alt_versions: bool,
    pub quality: String,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub service_id: Option<i64>,
}

/// Paginated movies response
#[derive(Serialize)]
pub struct MovieListResponse {
    pub movies: Vec<Movie>,
    pub count: i64,
}

// ==================== Service Types ====================

/// Create/rename service request
#[derive(Deserialize)]
pub struct ServiceRequest {
    pub name: String,
}

/// Paginated services response
#[derive(Serialize)]
pub struct ServiceListResponse {
    pub services: Vec<Service>,
    pub count: i64,
}
