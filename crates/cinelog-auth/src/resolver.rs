//! Credential verification and token-to-account resolution

use async_trait::async_trait;
use cinelog_db::{Database, DbError, User};
use tracing::{debug, warn};

use crate::error::AuthError;
use crate::jwt::JwtManager;
use crate::password::{DUMMY_HASH, verify_password};

/// Account lookup used by login and token resolution
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Find an account by its unique username
    async fn find_account_by_username(&self, username: &str) -> Result<Option<User>, DbError>;
}

#[async_trait]
impl CredentialStore for Database {
    async fn find_account_by_username(&self, username: &str) -> Result<Option<User>, DbError> {
        self.get_user_by_username(username).await
    }
}

/// Check a username/password pair against the store
///
/// Unknown usernames and wrong passwords both yield
/// [`AuthError::InvalidCredentials`]. The disabled flag is not checked
/// here; disabled accounts are stopped by the active-account guard.
pub async fn authenticate<S>(store: &S, username: &str, password: &str) -> Result<User, AuthError>
where
    S: CredentialStore + ?Sized,
{
    let user = store.find_account_by_username(username).await?;

    let hash_to_verify = match &user {
        Some(u) => u.password_hash.clone(),
        None => DUMMY_HASH.to_string(),
    };

    let password = password.to_string();
    let password_valid =
        tokio::task::spawn_blocking(move || verify_password(&password, &hash_to_verify))
            .await
            .map_err(|e| AuthError::PasswordHash(e.to_string()))?;

    match (user, password_valid) {
        (Some(user), true) => {
            debug!("Credentials accepted for user: {}", user.username);
            Ok(user)
        }
        _ => {
            warn!("Failed login attempt for user: {}", username);
            Err(AuthError::InvalidCredentials)
        }
    }
}

/// Resolve a bearer token to the account it names
///
/// Disabled accounts are returned as-is.
pub async fn resolve_token<S>(jwt: &JwtManager, store: &S, token: &str) -> Result<User, AuthError>
where
    S: CredentialStore + ?Sized,
{
    let claims = jwt.validate_token(token)?;

    store
        .find_account_by_username(&claims.sub)
        .await?
        .ok_or_else(|| {
            debug!("Token subject no longer exists: {}", claims.sub);
            AuthError::InvalidToken
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::require_active;
    use crate::password::hash_password;
    use chrono::Duration;
    use cinelog_db::{NewUser, UpdateUser};
    use jsonwebtoken::Algorithm;

    async fn store_with(username: &str, password: &str, disabled: bool) -> Database {
        let db = Database::new("sqlite::memory:").await.unwrap();
        db.insert_user(NewUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            full_name: username.to_string(),
            password_hash: hash_password(password).unwrap(),
            disabled,
        })
        .await
        .unwrap();
        db
    }

    fn jwt() -> JwtManager {
        JwtManager::new("resolver-secret", Algorithm::HS256, 30).unwrap()
    }

    #[tokio::test]
    async fn test_issue_resolve_round_trip() {
        let db = store_with("alice", "secret1", false).await;
        let jwt = jwt();

        let user = authenticate(&db, "alice", "secret1").await.unwrap();
        let token = jwt.issue_token(&user.username).unwrap();
        let resolved = resolve_token(&jwt, &db, &token).await.unwrap();

        assert_eq!(resolved.id, user.id);
        assert_eq!(resolved.username, "alice");
    }

    #[tokio::test]
    async fn test_wrong_password_matches_unknown_user() {
        let db = store_with("alice", "secret1", false).await;

        let wrong_password = authenticate(&db, "alice", "secret2").await.unwrap_err();
        let unknown_user = authenticate(&db, "mallory", "secret1").await.unwrap_err();

        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_user, AuthError::InvalidCredentials));
        assert_eq!(
            wrong_password.status_and_detail(),
            unknown_user.status_and_detail()
        );
    }

    #[tokio::test]
    async fn test_expired_token_rejected_before_lookup() {
        let db = store_with("alice", "secret1", false).await;
        let jwt = jwt();

        let token = jwt
            .issue_token_with_ttl("alice", Duration::seconds(-1))
            .unwrap();
        assert!(matches!(
            resolve_token(&jwt, &db, &token).await,
            Err(AuthError::TokenExpired)
        ));
    }

    #[tokio::test]
    async fn test_unknown_subject_is_invalid() {
        let db = store_with("alice", "secret1", false).await;
        let jwt = jwt();

        let token = jwt.issue_token("ghost").unwrap();
        assert!(matches!(
            resolve_token(&jwt, &db, &token).await,
            Err(AuthError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn test_renamed_account_invalidates_old_tokens() {
        let db = store_with("alice", "secret1", false).await;
        let jwt = jwt();
        let token = jwt.issue_token("alice").unwrap();

        let alice = db.get_user_by_username("alice").await.unwrap().unwrap();
        db.update_user(
            alice.id,
            UpdateUser {
                username: Some("alice2".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert!(matches!(
            resolve_token(&jwt, &db, &token).await,
            Err(AuthError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn test_disabled_account_fails_at_active_check() {
        let db = store_with("dora", "secret1", true).await;
        let jwt = jwt();

        let user = authenticate(&db, "dora", "secret1").await.unwrap();
        let token = jwt.issue_token(&user.username).unwrap();
        let resolved = resolve_token(&jwt, &db, &token).await.unwrap();

        assert!(matches!(
            require_active(resolved),
            Err(AuthError::InactiveAccount)
        ));
    }
}
