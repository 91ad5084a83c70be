//! Client-side session lifecycle for the Crescent app.
//!
//! This crate provides:
//! - [`SessionManager`], owning device identity, token acquisition, session
//!   persistence/restoration, and logout
//! - Explicit FSM-based lifecycle state management
//! - A single-flight guard so only one authentication operation runs at a
//!   time per session
//! - Local input validation and the session error taxonomy
//! - The [`PushTokenProvider`] seam for the push notification subsystem

mod error;
mod manager;
mod push_token;
mod session_fsm;
pub mod validate;

pub use error::{ErrorInfo, ErrorKind, SessionError, SessionResult};
pub use manager::{SessionManager, SessionSnapshot};
pub use push_token::{NoPushTokens, PushTokenProvider};
pub use session_fsm::session_machine;
pub use session_fsm::{SessionMachine, SessionMachineInput, SessionMachineState, SessionStatus};
pub use validate::ValidationError;
