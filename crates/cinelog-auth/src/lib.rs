//! Cinelog Authentication and Authorization
//!
//! This crate provides Argon2 password hashing, JWT bearer tokens,
//! request identity resolution and the active/ownership guards used
//! by the Cinelog API.

pub mod bearer;
pub mod error;
pub mod guard;
pub mod jwt;
pub mod password;
pub mod resolver;

pub use bearer::{AuthUser, extract_bearer_token};
pub use error::AuthError;
pub use guard::{require_active, require_ownership};
pub use jsonwebtoken::Algorithm;
pub use jwt::{Claims, JwtManager, SUPPORTED_ALGORITHMS, parse_algorithm, token_lifetime};
pub use password::{hash_password, verify_password};
pub use resolver::{CredentialStore, authenticate, resolve_token};
