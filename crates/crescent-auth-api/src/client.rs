//! HTTP client for the authentication API.

use crate::error::{ApiError, ApiResult};
use crate::types::{
    LoginRequest, LogoutRequest, RegisterRequest, RegisterResponse, TokenGrant, UserProfile,
    VerifyOtpRequest,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Bounded timeout applied to every request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Interface to the remote authentication API.
///
/// The session manager depends on this trait rather than on the concrete
/// HTTP client, so tests can script responses without a network.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// `POST /api/auth/login` — exchange credentials for a token grant.
    async fn login(&self, request: &LoginRequest) -> ApiResult<TokenGrant>;

    /// `POST /api/auth/register` — create an account; no token is issued.
    async fn register(&self, request: &RegisterRequest) -> ApiResult<RegisterResponse>;

    /// `POST /api/auth/verify-otp` — confirm the email OTP; issues the
    /// first token grant for a freshly registered account.
    async fn verify_otp(&self, request: &VerifyOtpRequest) -> ApiResult<TokenGrant>;

    /// `POST /api/auth/logout` — invalidate the token server-side. The
    /// response body is not consumed.
    async fn logout(&self, request: &LogoutRequest) -> ApiResult<()>;
}

/// Login response. A 2xx without both fields is malformed.
#[derive(Debug, Deserialize)]
struct LoginResponseWire {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    user: Option<UserProfile>,
}

/// OTP verification response.
///
/// Two shapes have been observed from deployed backends: the grant nested
/// under `data`, and the grant inlined at the top level. Both are accepted
/// through this explicit discriminated parse; anything else is malformed.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum VerifyOtpResponseWire {
    Enveloped {
        status: String,
        data: VerifyOtpDataWire,
    },
    Flat {
        #[serde(default)]
        status: Option<String>,
        token: String,
        user: UserProfile,
    },
}

#[derive(Debug, Deserialize)]
struct VerifyOtpDataWire {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    user: Option<UserProfile>,
}

/// reqwest-backed [`AuthApi`] implementation.
#[derive(Clone)]
pub struct HttpAuthApi {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpAuthApi {
    /// Create a new client for the given API base URL.
    pub fn new(base_url: impl Into<String>) -> ApiResult<Self> {
        Self::with_timeout(base_url, REQUEST_TIMEOUT)
    }

    /// Create a new client with a custom request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> ApiResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Build the URL for an auth endpoint.
    fn auth_url(&self, endpoint: &str) -> String {
        format!("{}/api/auth/{}", self.base_url, endpoint)
    }

    /// POST a JSON body and return the 2xx response body as text.
    ///
    /// Non-2xx responses are translated to [`ApiError::Api`] with the
    /// `message` field extracted from the body when present, else a generic
    /// message. Transport failures become `Network`, an elapsed client
    /// timeout becomes `Timeout`.
    async fn post_json<B: Serialize>(&self, endpoint: &str, body: &B) -> ApiResult<String> {
        let url = self.auth_url(endpoint);
        debug!(url = %url, "Calling auth API");

        let response = self
            .http_client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(classify_transport_error)?;

        if !status.is_success() {
            warn!(status = %status, endpoint = %endpoint, "Auth API request failed");
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: extract_message(&text)
                    .unwrap_or_else(|| format!("Request failed with HTTP {}", status.as_u16())),
            });
        }

        Ok(text)
    }

    fn parse<T: DeserializeOwned>(body: &str) -> ApiResult<T> {
        serde_json::from_str(body).map_err(|e| ApiError::Malformed(e.to_string()))
    }
}

/// Map a reqwest transport error to the API error taxonomy.
fn classify_transport_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::Network(e.to_string())
    }
}

/// Pull the human-readable `message` field out of an error body, if any.
fn extract_message(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get("message")?
        .as_str()
        .map(String::from)
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, request: &LoginRequest) -> ApiResult<TokenGrant> {
        let body = self.post_json("login", request).await?;
        let wire: LoginResponseWire = Self::parse(&body)?;

        match (wire.token, wire.user) {
            (Some(token), Some(user)) => Ok(TokenGrant { token, user }),
            _ => Err(ApiError::Malformed(
                "login response missing token or user".to_string(),
            )),
        }
    }

    async fn register(&self, request: &RegisterRequest) -> ApiResult<RegisterResponse> {
        let body = self.post_json("register", request).await?;
        Self::parse(&body)
    }

    async fn verify_otp(&self, request: &VerifyOtpRequest) -> ApiResult<TokenGrant> {
        let body = self.post_json("verify-otp", request).await?;
        let wire: VerifyOtpResponseWire = Self::parse(&body)?;

        match wire {
            VerifyOtpResponseWire::Enveloped { status, data } => {
                if status != "success" {
                    return Err(ApiError::Malformed(format!(
                        "verification response status was {:?}",
                        status
                    )));
                }
                match (data.token, data.user) {
                    (Some(token), Some(user)) => Ok(TokenGrant { token, user }),
                    _ => Err(ApiError::Malformed(
                        "verification response missing token or user".to_string(),
                    )),
                }
            }
            VerifyOtpResponseWire::Flat { status, token, user } => {
                if let Some(status) = status {
                    if status != "success" {
                        return Err(ApiError::Malformed(format!(
                            "verification response status was {:?}",
                            status
                        )));
                    }
                }
                Ok(TokenGrant { token, user })
            }
        }
    }

    async fn logout(&self, request: &LogoutRequest) -> ApiResult<()> {
        self.post_json("logout", request).await?;
        Ok(())
    }
}
