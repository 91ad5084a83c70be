//! Session lifecycle management with FSM-based state tracking.
//!
//! This module provides a `SessionManager` that owns the authenticated
//! session: device identity, token acquisition, persistence and restoration,
//! and logout. An internal finite state machine tracks the in-flight
//! operation explicitly, and a single-flight guard ensures only one
//! authentication operation runs per manager at a time.

use crate::error::{ErrorInfo, SessionError, SessionResult};
use crate::push_token::PushTokenProvider;
use crate::session_fsm::{SessionMachine, SessionMachineInput, SessionStatus};
use crate::validate;
use crescent_auth_api::{
    AuthApi, LoginRequest, LogoutRequest, RegisterRequest, TokenGrant, UserProfile,
    VerifyOtpRequest,
};
use crescent_storage::{SessionVault, StorageError};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Read-only view of the session for the presentation layer.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    /// Bearer token; `None` means unauthenticated.
    pub token: Option<String>,
    /// Profile of the logged-in user; present iff `token` is present.
    pub user: Option<UserProfile>,
    /// Current lifecycle state.
    pub status: SessionStatus,
    /// Whether onboarding has been completed on this installation.
    pub has_onboarded: bool,
    /// Error from the most recent failed operation, if any.
    pub last_error: Option<ErrorInfo>,
}

impl SessionSnapshot {
    /// Returns true if a session is established.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// In-memory session state, mirrored from persisted storage.
#[derive(Default)]
struct SessionState {
    device_id: Option<String>,
    token: Option<String>,
    user: Option<UserProfile>,
    has_onboarded: bool,
    last_error: Option<ErrorInfo>,
}

/// Session manager owning the client-side authentication lifecycle.
///
/// Constructed once per process start by the application's root composition
/// point and handed to whichever layer needs it — there is no ambient
/// singleton. All mutation goes through the operations below.
pub struct SessionManager {
    vault: SessionVault,
    api: Arc<dyn AuthApi>,
    push_tokens: Arc<dyn PushTokenProvider>,
    /// Internal FSM for tracking lifecycle transitions.
    fsm: Mutex<SessionMachine>,
    state: Mutex<SessionState>,
    /// Single-flight guard: exactly one operation may hold this at a time.
    /// A second invocation is rejected with `Busy`, never queued.
    op_guard: tokio::sync::Mutex<()>,
}

impl SessionManager {
    /// Build the manager from persisted storage.
    ///
    /// Runs once at process start, before anything that depends on auth
    /// state renders:
    /// 1. Read or generate the device identifier from the secure store.
    /// 2. Read the onboarding flag.
    /// 3. Read the persisted token/user pair; a half-present or unreadable
    ///    pair is cleared rather than adopted.
    ///
    /// Every read failure degrades to the unauthenticated default — a
    /// storage problem never prevents startup.
    pub fn initialize(
        vault: SessionVault,
        api: Arc<dyn AuthApi>,
        push_tokens: Arc<dyn PushTokenProvider>,
    ) -> Self {
        let mut state = SessionState::default();

        match vault.ensure_device_id() {
            Ok(id) => state.device_id = Some(id),
            Err(e) => {
                warn!(error = %e, "Device identity unavailable, device-bound operations will fail fast");
            }
        }

        state.has_onboarded = vault.has_onboarded();

        match vault.load_session() {
            Ok(Some((token, user_json))) => match serde_json::from_str::<UserProfile>(&user_json) {
                Ok(user) => {
                    debug!(user_id = %user.id, "Restored persisted session");
                    state.token = Some(token);
                    state.user = Some(user);
                }
                Err(e) => {
                    warn!(error = %e, "Persisted user profile unreadable, clearing session");
                    if let Err(e) = vault.clear_session() {
                        warn!(error = %e, "Failed to clear corrupted session");
                    }
                }
            },
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, "Failed to read persisted session, starting unauthenticated");
            }
        }

        let manager = Self {
            vault,
            api,
            push_tokens,
            fsm: Mutex::new(SessionMachine::new()),
            state: Mutex::new(state),
            op_guard: tokio::sync::Mutex::new(()),
        };

        // Initializing -> Ready; the machine is freshly constructed so the
        // transition cannot be rejected
        let _ = manager.transition(&SessionMachineInput::RestoreComplete);
        manager
    }

    // ==========================================
    // Observable state
    // ==========================================

    /// Current lifecycle status.
    pub fn status(&self) -> SessionStatus {
        let fsm = self.fsm.lock().unwrap();
        SessionStatus::from(fsm.state())
    }

    /// Read-only snapshot for the presentation layer.
    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.lock().unwrap();
        SessionSnapshot {
            token: state.token.clone(),
            user: state.user.clone(),
            status: self.status(),
            has_onboarded: state.has_onboarded,
            last_error: state.last_error.clone(),
        }
    }

    /// Returns true if a session is established.
    pub fn is_authenticated(&self) -> bool {
        self.state.lock().unwrap().token.is_some()
    }

    /// The stable device identifier, if it loaded successfully.
    pub fn device_id(&self) -> Option<String> {
        self.state.lock().unwrap().device_id.clone()
    }

    /// Error from the most recent failed operation, if any.
    pub fn last_error(&self) -> Option<ErrorInfo> {
        self.state.lock().unwrap().last_error.clone()
    }

    // ==========================================
    // Operations
    // ==========================================

    /// Login with email and password.
    ///
    /// On success the token and user profile are persisted together and
    /// mirrored in memory. On any failure the session is left untouched,
    /// `last_error` is set, and false is returned. The manager is back in
    /// `Ready` when this returns, success or not.
    pub async fn login(&self, email: &str, password: &str) -> bool {
        let _guard = match self.op_guard.try_lock() {
            Ok(guard) => guard,
            Err(_) => return self.fail(SessionError::Busy),
        };
        self.clear_last_error();

        if let Err(e) = validate::login(email, password) {
            return self.fail(e.into());
        }
        let Some(device_id) = self.device_id() else {
            return self.fail(SessionError::DeviceIdentityUnavailable);
        };
        if self.transition(&SessionMachineInput::LoginAttempt).is_err() {
            return self.fail(SessionError::Busy);
        }

        let outcome = self.perform_login(email, password, &device_id).await;
        self.finish_operation();

        match outcome {
            Ok(user_id) => {
                info!(user_id = %user_id, "Login successful");
                true
            }
            Err(e) => self.fail(e),
        }
    }

    async fn perform_login(
        &self,
        email: &str,
        password: &str,
        device_id: &str,
    ) -> SessionResult<String> {
        let push_token = self.push_tokens.push_token().await;

        let grant = self
            .api
            .login(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
                device_id: device_id.to_string(),
                push_token,
            })
            .await?;

        self.adopt_session(grant)
    }

    /// Register a new account.
    ///
    /// A successful registration does **not** create a session — the API
    /// issues no token until the email is verified via [`Self::verify_email`].
    pub async fn register(&self, username: &str, email: &str, password: &str) -> bool {
        let _guard = match self.op_guard.try_lock() {
            Ok(guard) => guard,
            Err(_) => return self.fail(SessionError::Busy),
        };
        self.clear_last_error();

        if let Err(e) = validate::register(username, email, password) {
            return self.fail(e.into());
        }
        let Some(device_id) = self.device_id() else {
            return self.fail(SessionError::DeviceIdentityUnavailable);
        };
        if self
            .transition(&SessionMachineInput::RegisterAttempt)
            .is_err()
        {
            return self.fail(SessionError::Busy);
        }

        let outcome = self
            .perform_register(username, email, password, &device_id)
            .await;
        self.finish_operation();

        match outcome {
            Ok(()) => {
                info!(email = %email, "Registration accepted, awaiting email verification");
                true
            }
            Err(e) => self.fail(e),
        }
    }

    async fn perform_register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        device_id: &str,
    ) -> SessionResult<()> {
        let push_token = self.push_tokens.push_token().await;

        let response = self
            .api
            .register(&RegisterRequest {
                email: email.to_string(),
                password: password.to_string(),
                username: username.to_string(),
                device_id: device_id.to_string(),
                push_token,
            })
            .await?;

        if response.is_success() {
            Ok(())
        } else {
            Err(SessionError::Api {
                message: response
                    .message
                    .unwrap_or_else(|| "Registration failed".to_string()),
            })
        }
    }

    /// Verify the email OTP issued after registration.
    ///
    /// On success the freshly registered account becomes an authenticated
    /// session, persisted exactly as in login.
    pub async fn verify_email(&self, email: &str, otp: &str) -> bool {
        let _guard = match self.op_guard.try_lock() {
            Ok(guard) => guard,
            Err(_) => return self.fail(SessionError::Busy),
        };
        self.clear_last_error();

        if let Err(e) = validate::verify(email, otp) {
            return self.fail(e.into());
        }
        if self.transition(&SessionMachineInput::VerifyAttempt).is_err() {
            return self.fail(SessionError::Busy);
        }

        let outcome = self.perform_verify(email, otp).await;
        self.finish_operation();

        match outcome {
            Ok(user_id) => {
                info!(user_id = %user_id, "Email verified, session established");
                true
            }
            Err(e) => self.fail(e),
        }
    }

    async fn perform_verify(&self, email: &str, otp: &str) -> SessionResult<String> {
        let grant = self
            .api
            .verify_otp(&VerifyOtpRequest {
                email: email.to_string(),
                otp: otp.trim().to_string(),
            })
            .await?;

        self.adopt_session(grant)
    }

    /// Logout.
    ///
    /// The remote call is attempted with whatever token and device id the
    /// client currently holds (empty token if absent), but the local session
    /// is cleared unconditionally — sign-out must be effective even with the
    /// network unreachable. Remote failure is logged, never surfaced as a
    /// failed logout.
    pub async fn logout(&self) {
        let _guard = match self.op_guard.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                self.fail(SessionError::Busy);
                return;
            }
        };
        self.clear_last_error();

        if self
            .transition(&SessionMachineInput::LogoutRequested)
            .is_err()
        {
            self.fail(SessionError::Busy);
            return;
        }

        let device_id = self.device_id().unwrap_or_default();
        let access_token = {
            let state = self.state.lock().unwrap();
            state.token.clone().unwrap_or_default()
        };

        if let Err(e) = self
            .api
            .logout(&LogoutRequest {
                device_id,
                access_token,
            })
            .await
        {
            warn!(error = %e, "Remote logout failed, clearing local session anyway");
        }

        if let Err(e) = self.vault.clear_session() {
            warn!(error = %e, "Failed to clear persisted session");
        }
        {
            let mut state = self.state.lock().unwrap();
            state.token = None;
            state.user = None;
        }

        self.finish_operation();
        info!("Logged out");
    }

    /// Mark onboarding as completed. Idempotent; the flag is never reset.
    ///
    /// A persistence failure is logged but the in-memory flag is set
    /// regardless, so the current process proceeds past onboarding.
    pub fn complete_onboarding(&self) {
        {
            let mut state = self.state.lock().unwrap();
            state.has_onboarded = true;
        }

        if let Err(e) = self.vault.set_onboarded() {
            warn!(error = %e, "Failed to persist onboarding flag");
        }
    }

    // ==========================================
    // Internals
    // ==========================================

    /// Transition the FSM, logging state changes.
    fn transition(&self, input: &SessionMachineInput) -> Result<SessionStatus, SessionError> {
        let mut fsm = self.fsm.lock().unwrap();
        let old_state = SessionStatus::from(fsm.state());

        fsm.consume(input).map_err(|_| SessionError::Busy)?;

        let new_state = SessionStatus::from(fsm.state());
        drop(fsm);

        if old_state != new_state {
            debug!(old_state = ?old_state, new_state = ?new_state, "Session state transition");
        }

        Ok(new_state)
    }

    /// Restore `Ready` after an operation, whatever its outcome was.
    fn finish_operation(&self) {
        if self
            .transition(&SessionMachineInput::OperationComplete)
            .is_err()
        {
            // Unreachable: every in-flight state accepts OperationComplete
            warn!("Session state machine missed an operation completion");
        }
    }

    /// Persist a token grant and mirror it in memory.
    ///
    /// Token and user are written in one store update so the pair can never
    /// go out of step, even if the process dies mid-operation.
    fn adopt_session(&self, grant: TokenGrant) -> SessionResult<String> {
        let user_json = serde_json::to_string(&grant.user)
            .map_err(|e| SessionError::Storage(StorageError::Encoding(e.to_string())))?;
        self.vault.store_session(&grant.token, &user_json)?;

        let mut state = self.state.lock().unwrap();
        state.token = Some(grant.token);
        let user_id = grant.user.id.clone();
        state.user = Some(grant.user);
        Ok(user_id)
    }

    /// Record a failed operation and return false for the caller.
    fn fail(&self, error: SessionError) -> bool {
        warn!(error = %error, "Session operation failed");
        let mut state = self.state.lock().unwrap();
        state.last_error = Some(ErrorInfo::from(&error));
        false
    }

    fn clear_last_error(&self) {
        self.state.lock().unwrap().last_error = None;
    }
}
