//! CLI command implementations.

pub mod auth;

use anyhow::{Context, Result};
use crescent_auth_api::HttpAuthApi;
use crescent_core::{Config, Paths};
use crescent_session::{NoPushTokens, SessionManager};
use crescent_storage::{create_storage, PreferenceStore, SessionVault};
use std::sync::Arc;

/// Compose a session manager from the on-disk state and configuration.
///
/// This is the root composition point: the manager is built here once per
/// invocation and passed down to the command that needs it.
pub fn build_session_manager() -> Result<SessionManager> {
    let paths = Paths::new().context("Failed to resolve client directories")?;
    let config = Config::load(&paths).context("Failed to load configuration")?;

    let secure = create_storage().context("Failed to open platform secure storage")?;
    let prefs = PreferenceStore::open(paths.preferences_file());
    let vault = SessionVault::new(secure, prefs);

    let api =
        HttpAuthApi::new(config.api_base_url.clone()).context("Failed to construct API client")?;

    Ok(SessionManager::initialize(
        vault,
        Arc::new(api),
        Arc::new(NoPushTokens),
    ))
}
