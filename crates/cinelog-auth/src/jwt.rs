//! JWT token management

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::AuthError;

/// Signing algorithms usable with a shared secret
pub const SUPPORTED_ALGORITHMS: &[&str] = &["HS256", "HS384", "HS512"];

/// Parse a configured algorithm name
///
/// Only HMAC algorithms are accepted since the server signs with a
/// symmetric secret.
pub fn parse_algorithm(name: &str) -> Result<Algorithm, AuthError> {
    match name.trim().to_ascii_uppercase().as_str() {
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        _ => Err(AuthError::UnsupportedAlgorithm(name.to_string())),
    }
}

/// Validate a configured token lifetime
///
/// The lifetime must be positive and `now + lifetime` must stay within the
/// representable date range.
pub fn token_lifetime(minutes: i64) -> Result<Duration, AuthError> {
    let lifetime = Duration::try_minutes(minutes)
        .filter(|lifetime| *lifetime > Duration::zero())
        .ok_or(AuthError::InvalidTokenLifetime(minutes))?;

    Utc::now()
        .checked_add_signed(lifetime)
        .ok_or(AuthError::InvalidTokenLifetime(minutes))?;

    Ok(lifetime)
}

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (username); empty when the token carried none
    #[serde(default)]
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    #[serde(default)]
    pub iat: i64,
    /// Unique token ID
    #[serde(default)]
    pub jti: String,
}

/// JWT manager for token generation and validation
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    token_expiry: Duration,
}

impl JwtManager {
    /// Create a new JWT manager
    pub fn new(
        secret: &str,
        algorithm: Algorithm,
        token_expiry_minutes: i64,
    ) -> Result<Self, AuthError> {
        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            algorithm,
            token_expiry: token_lifetime(token_expiry_minutes)?,
        })
    }

    /// Issue a token for `subject` with the configured TTL
    pub fn issue_token(&self, subject: &str) -> Result<String, AuthError> {
        self.issue_token_with_ttl(subject, self.token_expiry)
    }

    /// Issue a token for `subject` valid for `ttl`
    pub fn issue_token_with_ttl(&self, subject: &str, ttl: Duration) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now
            .checked_add_signed(ttl)
            .ok_or(AuthError::InvalidTokenLifetime(ttl.num_minutes()))?;

        let claims = Claims {
            sub: subject.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        debug!("Issuing token for user: {}", subject);

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key).map_err(AuthError::Jwt)
    }

    /// Validate a token and return its claims
    ///
    /// Checks run in a fixed order: signature and payload shape, then
    /// subject presence, then expiry. Expiry has no leeway; a token is
    /// dead from the second its `exp` is reached.
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = false;
        validation.leeway = 0;

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => {
                    debug!("Token rejected: {}", e);
                    AuthError::InvalidToken
                }
            })?;

        let claims = token_data.claims;
        if claims.sub.is_empty() {
            return Err(AuthError::InvalidToken);
        }

        if Utc::now().timestamp() >= claims.exp {
            return Err(AuthError::TokenExpired);
        }

        Ok(claims)
    }
}
