//! Bearer credential extraction and the request-scoped identity

use axum::http::{HeaderMap, header::AUTHORIZATION};
use cinelog_db::User;
use tracing::debug;

use crate::error::AuthError;
use crate::guard::{require_active, require_ownership};
use crate::jwt::JwtManager;
use crate::resolver::{CredentialStore, resolve_token};

/// Account resolved from the bearer token of the current request
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
}

impl AuthUser {
    /// Resolve the identity behind the request's `Authorization` header
    pub async fn from_headers<S>(
        jwt: &JwtManager,
        store: &S,
        headers: &HeaderMap,
    ) -> Result<Self, AuthError>
    where
        S: CredentialStore + ?Sized,
    {
        let token = extract_bearer_token(headers)?;
        let user = resolve_token(jwt, store, token).await?;

        debug!("Authenticated user: {} (id {})", user.username, user.id);
        Ok(Self { user })
    }

    pub fn id(&self) -> i64 {
        self.user.id
    }

    pub fn username(&self) -> &str {
        &self.user.username
    }

    /// Keep the identity only if the account is enabled
    pub fn into_active(self) -> Result<Self, AuthError> {
        require_active(self.user).map(|user| Self { user })
    }

    /// Fail unless this identity owns the resource
    pub fn ensure_owns(&self, owner_id: i64) -> Result<(), AuthError> {
        require_ownership(&self.user, owner_id)
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header
///
/// The scheme name is matched case-insensitively.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    let (scheme, token) = header
        .split_once(' ')
        .ok_or(AuthError::InvalidAuthHeader)?;

    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(AuthError::InvalidAuthHeader);
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token(&headers("Bearer abc.def")).unwrap(), "abc.def");
        assert_eq!(extract_bearer_token(&headers("bearer abc")).unwrap(), "abc");
    }

    #[test]
    fn test_rejects_bad_headers() {
        assert!(matches!(
            extract_bearer_token(&HeaderMap::new()),
            Err(AuthError::MissingAuthHeader)
        ));
        assert!(matches!(
            extract_bearer_token(&headers("Basic YWxpY2U6c2VjcmV0")),
            Err(AuthError::InvalidAuthHeader)
        ));
        assert!(matches!(
            extract_bearer_token(&headers("Bearer")),
            Err(AuthError::InvalidAuthHeader)
        ));
        assert!(matches!(
            extract_bearer_token(&headers("Bearer   ")),
            Err(AuthError::InvalidAuthHeader)
        ));
    }
}
