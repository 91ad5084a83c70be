//! Wire types for the authentication API.
//!
//! Requests use snake_case field names; the embedded user object in
//! responses is camelCase.

use serde::{Deserialize, Serialize};

/// Profile of an account as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub username: String,
    /// Whether the email address has been verified via OTP.
    #[serde(default)]
    pub is_verified: bool,
    /// Omitted by the backend on some responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Body for `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub device_id: String,
    pub push_token: Option<String>,
}

/// Body for `POST /api/auth/register`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub username: String,
    pub device_id: String,
    pub push_token: Option<String>,
}

/// Body for `POST /api/auth/verify-otp`.
#[derive(Debug, Clone, Serialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
}

/// Body for `POST /api/auth/logout`.
#[derive(Debug, Clone, Serialize)]
pub struct LogoutRequest {
    pub device_id: String,
    pub access_token: String,
}

/// A token and the profile it belongs to, issued by login or OTP
/// verification. The two only ever travel together.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenGrant {
    pub token: String,
    pub user: UserProfile,
}

/// Response for `POST /api/auth/register`.
///
/// Registration does not issue a token; the account becomes a session only
/// after OTP verification.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl RegisterResponse {
    /// The API signals registration success with `status == "success"`.
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}
