//! Storage key constants.

/// Storage keys used by the client
pub struct StorageKeys;

impl StorageKeys {
    /// Device identifier (secure store)
    pub const DEVICE_ID: &'static str = "device-id";

    /// Bearer token for the current session (preference store)
    pub const USER_TOKEN: &'static str = "user-token";

    /// JSON-serialized profile of the logged-in user (preference store)
    pub const USER_DATA: &'static str = "user-data";

    /// One-time onboarding completion flag (preference store)
    pub const HAS_ONBOARDED: &'static str = "has-onboarded";
}
