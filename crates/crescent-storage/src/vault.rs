//! High-level API for the persisted session state.

use crate::{PreferenceStore, SecureStorage, StorageKeys, StorageResult};
use tracing::{info, warn};
use uuid::Uuid;

/// Typed facade over the secure store and the preference store.
///
/// The device identifier lives in the platform secure store; the session
/// token, user profile, and onboarding flag live in the preference store.
pub struct SessionVault {
    secure: Box<dyn SecureStorage>,
    prefs: PreferenceStore,
}

impl SessionVault {
    /// Create a new vault with the given backing stores.
    pub fn new(secure: Box<dyn SecureStorage>, prefs: PreferenceStore) -> Self {
        Self { secure, prefs }
    }

    // ==========================================
    // Device identity
    // ==========================================

    /// Retrieve the device identifier.
    pub fn device_id(&self) -> StorageResult<Option<String>> {
        self.secure.get(StorageKeys::DEVICE_ID)
    }

    /// Retrieve the device identifier, generating and persisting a new one
    /// if none exists yet. The identifier is never regenerated while a
    /// stored value exists.
    pub fn ensure_device_id(&self) -> StorageResult<String> {
        if let Some(id) = self.secure.get(StorageKeys::DEVICE_ID)? {
            if !id.is_empty() {
                return Ok(id);
            }
        }

        let id = Uuid::new_v4().to_string();
        self.secure.set(StorageKeys::DEVICE_ID, &id)?;
        info!(device_id = %id, "Generated new device ID");
        Ok(id)
    }

    // ==========================================
    // Session token + user profile
    // ==========================================

    /// Persist the token and serialized user profile together.
    pub fn store_session(&self, token: &str, user_json: &str) -> StorageResult<()> {
        self.prefs.set_many(&[
            (StorageKeys::USER_TOKEN, token),
            (StorageKeys::USER_DATA, user_json),
        ])
    }

    /// Load the persisted token/user pair.
    ///
    /// The two keys are valid only together. If exactly one is present the
    /// state is treated as corrupted and both are cleared — the caller sees
    /// no session rather than a half-authenticated one.
    pub fn load_session(&self) -> StorageResult<Option<(String, String)>> {
        let token = self.prefs.get(StorageKeys::USER_TOKEN);
        let user_json = self.prefs.get(StorageKeys::USER_DATA);

        match (token, user_json) {
            (Some(token), Some(user_json)) => Ok(Some((token, user_json))),
            (None, None) => Ok(None),
            _ => {
                warn!("Persisted session is missing its token or user half, clearing both");
                self.clear_session()?;
                Ok(None)
            }
        }
    }

    /// Remove the persisted token and user profile.
    pub fn clear_session(&self) -> StorageResult<()> {
        self.prefs
            .remove_many(&[StorageKeys::USER_TOKEN, StorageKeys::USER_DATA])
    }

    // ==========================================
    // Onboarding flag
    // ==========================================

    /// Whether onboarding has been completed on this installation.
    pub fn has_onboarded(&self) -> bool {
        self.prefs
            .get(StorageKeys::HAS_ONBOARDED)
            .as_deref()
            .map(|v| v == "true")
            .unwrap_or(false)
    }

    /// Persist the onboarding flag. The flag is never reset.
    pub fn set_onboarded(&self) -> StorageResult<()> {
        self.prefs.set(StorageKeys::HAS_ONBOARDED, "true")
    }
}
