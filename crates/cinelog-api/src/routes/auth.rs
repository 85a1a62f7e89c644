//! Authentication extractors and routes

use axum::{
    Form, Json, Router,
    extract::{FromRef, FromRequestParts, State},
    http::request::Parts,
    routing::{get, post},
};
use cinelog_auth::{AuthError, AuthUser, authenticate};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;

use super::types::{LoginForm, TokenResponse, UserResponse};
use super::validation::{MAX_PASSWORD_LENGTH, MAX_USERNAME_LENGTH};

// ==================== Auth Extractors ====================

/// Extractor for the identity behind a valid bearer token
///
/// Disabled accounts pass; use [`ActiveUser`] to reject them.
pub struct CurrentUser(pub AuthUser);

impl<S> FromRequestParts<S> for CurrentUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let user = AuthUser::from_headers(&app_state.jwt, &app_state.db, &parts.headers)
            .await
            .inspect_err(|e| debug!("Rejected bearer credentials: {}", e))?;

        Ok(CurrentUser(user))
    }
}

/// Extractor for an authenticated, enabled account
pub struct ActiveUser(pub AuthUser);

impl<S> FromRequestParts<S> for ActiveUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        Ok(ActiveUser(user.into_active()?))
    }
}

// ==================== Auth Routes ====================

/// POST /token
async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponse>, ApiError> {
    // Oversized input can never match a stored account
    if form.username.len() > MAX_USERNAME_LENGTH || form.password.len() > MAX_PASSWORD_LENGTH {
        metrics::counter!("cinelog_logins_total", "outcome" => "rejected").increment(1);
        return Err(AuthError::InvalidCredentials.into());
    }

    debug!("Login attempt for user: {}", form.username);

    let user = match authenticate(&state.db, &form.username, &form.password).await {
        Ok(user) => user,
        Err(e) => {
            metrics::counter!("cinelog_logins_total", "outcome" => "rejected").increment(1);
            return Err(e.into());
        }
    };

    let access_token = state.jwt.issue_token(&user.username)?;

    metrics::counter!("cinelog_logins_total", "outcome" => "success").increment(1);
    info!("User {} logged in successfully", user.username);

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

/// GET /me
async fn me(ActiveUser(caller): ActiveUser) -> Json<UserResponse> {
    Json(caller.user.into())
}

/// Create auth routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/token", post(login))
        .route("/me", get(me))
}
