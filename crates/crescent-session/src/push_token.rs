//! Push-token acquisition seam.

use async_trait::async_trait;

/// Source of the push notification token sent with login and registration.
///
/// The push subsystem is an external collaborator; when none is wired in,
/// [`NoPushTokens`] stands in and the API receives a null token, which the
/// backend accepts.
#[async_trait]
pub trait PushTokenProvider: Send + Sync {
    /// Current push token, or `None` if unavailable.
    async fn push_token(&self) -> Option<String>;
}

/// Provider for builds without a push subsystem.
pub struct NoPushTokens;

#[async_trait]
impl PushTokenProvider for NoPushTokens {
    async fn push_token(&self) -> Option<String> {
        None
    }
}
