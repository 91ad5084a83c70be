//! Persistent storage for the Crescent client.
//!
//! Two storage tiers back the session state:
//! - A platform secure store for the device identifier:
//!   - **macOS**: Keychain Access via `security-framework`
//!   - **Linux**: Secret Service (GNOME Keyring / KWallet) via `secret-service`
//!   - **Windows**: Credential Vault via `windows` crate
//! - A JSON-file preference store for the session token, user profile, and
//!   onboarding flag.
//!
//! [`SessionVault`] is the typed facade over both that the session manager
//! uses; no other component writes these keys.

mod keys;
mod prefs;
mod traits;
mod vault;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "windows")]
mod windows;

pub use keys::StorageKeys;
pub use prefs::PreferenceStore;
pub use traits::SecureStorage;
pub use vault::SessionVault;

use thiserror::Error;

/// Service name used for all secure storage operations.
/// Must match the mobile app's service name to share keychain entries.
pub const SERVICE_NAME: &str = "dev.crescent.mobile";

/// Error type for storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Platform-specific storage error
    #[error("Platform storage error: {0}")]
    Platform(String),

    /// Encoding/decoding error
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Create the default platform-specific secure storage implementation.
pub fn create_storage() -> StorageResult<Box<dyn SecureStorage>> {
    #[cfg(target_os = "macos")]
    {
        let storage = macos::KeychainStorage::new(SERVICE_NAME)?;
        Ok(Box::new(storage))
    }

    #[cfg(target_os = "linux")]
    {
        let storage = linux::SecretServiceStorage::new(SERVICE_NAME)?;
        Ok(Box::new(storage))
    }

    #[cfg(target_os = "windows")]
    {
        let storage = windows::CredentialStorage::new(SERVICE_NAME)?;
        Ok(Box::new(storage))
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        Err(StorageError::Platform(
            "No secure storage implementation available for this platform".to_string(),
        ))
    }
}
