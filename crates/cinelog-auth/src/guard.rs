//! Authorization guards

use cinelog_db::User;
use tracing::warn;

use crate::error::AuthError;

/// Reject disabled accounts
pub fn require_active(user: User) -> Result<User, AuthError> {
    if !user.is_active() {
        warn!("Rejected request from inactive user: {}", user.username);
        return Err(AuthError::InactiveAccount);
    }
    Ok(user)
}

/// Reject callers acting on a resource owned by another account
pub fn require_ownership(user: &User, owner_id: i64) -> Result<(), AuthError> {
    if user.id != owner_id {
        warn!(
            "User {} (id {}) denied access to resource owned by {}",
            user.username, user.id, owner_id
        );
        return Err(AuthError::Forbidden);
    }
    Ok(())
}
