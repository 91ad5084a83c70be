//! Local input validation.
//!
//! Runs before any network call; a failed rule never reaches the API.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Minimum password length accepted by registration.
const MIN_PASSWORD_LEN: usize = 6;
/// Minimum username length accepted by registration.
const MIN_USERNAME_LEN: usize = 3;

/// Input validation failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Email must not be empty")]
    EmptyEmail,

    #[error("Email format is invalid")]
    InvalidEmail,

    #[error("Password must not be empty")]
    EmptyPassword,

    #[error("Password must be at least {MIN_PASSWORD_LEN} characters")]
    PasswordTooShort,

    #[error("Password must contain at least one uppercase letter")]
    PasswordMissingUppercase,

    #[error("Password must contain at least one digit")]
    PasswordMissingDigit,

    #[error("Password confirmation does not match")]
    PasswordMismatch,

    #[error("Username must not be empty")]
    EmptyUsername,

    #[error("Username must be at least {MIN_USERNAME_LEN} characters")]
    UsernameTooShort,

    #[error("Username may only contain letters, digits, and _ . - characters")]
    UsernameInvalidChars,

    #[error("Verification code must not be empty")]
    EmptyOtp,

    #[error("Verification code must be numeric")]
    OtpNotNumeric,
}

fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    EMAIL_REGEX.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap())
}

fn check_email(email: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() {
        return Err(ValidationError::EmptyEmail);
    }
    if !email_regex().is_match(email) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

/// Validate login inputs.
pub fn login(email: &str, password: &str) -> Result<(), ValidationError> {
    check_email(email)?;
    if password.is_empty() {
        return Err(ValidationError::EmptyPassword);
    }
    Ok(())
}

/// Validate registration inputs.
pub fn register(username: &str, email: &str, password: &str) -> Result<(), ValidationError> {
    if username.trim().is_empty() {
        return Err(ValidationError::EmptyUsername);
    }
    if username.len() < MIN_USERNAME_LEN {
        return Err(ValidationError::UsernameTooShort);
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        return Err(ValidationError::UsernameInvalidChars);
    }

    check_email(email)?;

    if password.is_empty() {
        return Err(ValidationError::EmptyPassword);
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(ValidationError::PasswordMissingUppercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::PasswordMissingDigit);
    }

    Ok(())
}

/// Validate OTP verification inputs.
pub fn verify(email: &str, otp: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() {
        return Err(ValidationError::EmptyEmail);
    }
    if otp.trim().is_empty() {
        return Err(ValidationError::EmptyOtp);
    }
    if !otp.trim().chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::OtpNotNumeric);
    }
    Ok(())
}

/// Check a password against its confirmation field.
///
/// The confirmation input belongs to the presentation layer, so this is
/// offered as a helper rather than folded into [`register`].
pub fn confirmation_matches(password: &str, confirmation: &str) -> Result<(), ValidationError> {
    if password != confirmation {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}
