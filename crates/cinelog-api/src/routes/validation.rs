//! Input validation shared by the handlers

use crate::error::ApiError;

/// Maximum allowed username length
pub const MAX_USERNAME_LENGTH: usize = 64;
/// Maximum allowed password length (prevent DoS with very large passwords)
pub const MAX_PASSWORD_LENGTH: usize = 256;
/// Minimum allowed password length
pub const MIN_PASSWORD_LENGTH: usize = 6;
/// Maximum length for free-text fields (names, emails, quality labels)
pub const MAX_TEXT_LENGTH: usize = 256;

/// Validate username format and length
pub fn validate_username(username: &str) -> Result<(), ApiError> {
    if username.is_empty() {
        return Err(ApiError::BadRequest("Username cannot be empty".to_string()));
    }
    if username.len() > MAX_USERNAME_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "Username exceeds maximum length of {} characters",
            MAX_USERNAME_LENGTH
        )));
    }
    // Only allow alphanumeric characters, underscores, dots and hyphens
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == '.')
    {
        return Err(ApiError::BadRequest(
            "Username can only contain alphanumeric characters, underscores, dots and hyphens"
                .to_string(),
        ));
    }
    Ok(())
}

/// Validate password length
pub fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        )));
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "Password exceeds maximum length of {} characters",
            MAX_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

/// Validate a required free-text field
pub fn validate_text(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::BadRequest(format!("{} cannot be empty", field)));
    }
    if value.len() > MAX_TEXT_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "{} exceeds maximum length of {} characters",
            field, MAX_TEXT_LENGTH
        )));
    }
    Ok(())
}

/// Minimal shape check for an email address
pub fn validate_email(email: &str) -> Result<(), ApiError> {
    validate_text("Email", email)?;
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(ApiError::BadRequest(format!("Invalid email: {}", email))),
    }
}
