//! Session state machine using rust-fsm.
//!
//! This module defines an explicit finite state machine for the session
//! lifecycle, so the in-flight operation is tracked as a state rather than
//! derived from storage checks or ad-hoc flags.
//!
//! ## State Diagram
//!
//! ```text
//! ┌──────────────────┐
//! │   Initializing   │ (initial, entered once at process start)
//! └────────┬─────────┘
//!          │ RestoreComplete
//!          ▼
//! ┌──────────────────┐  LoginAttempt / RegisterAttempt / VerifyAttempt
//! │      Ready       │ ───────────────────────────────────────────────┐
//! └──────┬───▲───────┘                                                │
//!        │   │ OperationComplete                                      ▼
//!        │   │                                     ┌──────────────────────────┐
//!        │   └─────────────────────────────────────│  AuthenticatingLogin /   │
//!        │ LogoutRequested                         │  AuthenticatingRegister /│
//!        ▼                                         │  AuthenticatingVerify    │
//! ┌──────────────────┐                             └──────────────────────────┘
//! │    LoggingOut    │
//! └──────┬───────────┘
//!        │ OperationComplete
//!        ▼
//!      Ready
//! ```

use rust_fsm::*;
use serde::{Deserialize, Serialize};

// Define the FSM using rust-fsm's declarative macro
// This generates a module `session_machine` with:
// - session_machine::State (enum)
// - session_machine::Input (enum)
// - session_machine::StateMachine (type alias)
// - session_machine::Impl (trait impl)
state_machine! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub session_machine(Initializing)

    Initializing => {
        RestoreComplete => Ready
    },
    Ready => {
        LoginAttempt => AuthenticatingLogin,
        RegisterAttempt => AuthenticatingRegister,
        VerifyAttempt => AuthenticatingVerify,
        LogoutRequested => LoggingOut
    },
    AuthenticatingLogin => {
        OperationComplete => Ready
    },
    AuthenticatingRegister => {
        OperationComplete => Ready
    },
    AuthenticatingVerify => {
        OperationComplete => Ready
    },
    LoggingOut => {
        OperationComplete => Ready
    }
}

// Re-export the generated types with clearer names
pub use session_machine::Input as SessionMachineInput;
pub use session_machine::State as SessionMachineState;
pub use session_machine::StateMachine as SessionMachine;

/// Session status for external consumption.
///
/// This is the presentation layer's view of the FSM state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Persisted state has not been read yet.
    Initializing,
    /// Idle; operations may be started.
    Ready,
    /// A login call is in flight.
    AuthenticatingLogin,
    /// A registration call is in flight.
    AuthenticatingRegister,
    /// An OTP verification call is in flight.
    AuthenticatingVerify,
    /// A logout is in flight.
    LoggingOut,
}

impl SessionStatus {
    /// Returns true if an operation may be started in this state.
    pub fn is_ready(&self) -> bool {
        matches!(self, SessionStatus::Ready)
    }

    /// Returns true while an operation is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            SessionStatus::AuthenticatingLogin
                | SessionStatus::AuthenticatingRegister
                | SessionStatus::AuthenticatingVerify
                | SessionStatus::LoggingOut
        )
    }
}

impl From<&SessionMachineState> for SessionStatus {
    fn from(state: &SessionMachineState) -> Self {
        match state {
            SessionMachineState::Initializing => SessionStatus::Initializing,
            SessionMachineState::Ready => SessionStatus::Ready,
            SessionMachineState::AuthenticatingLogin => SessionStatus::AuthenticatingLogin,
            SessionMachineState::AuthenticatingRegister => SessionStatus::AuthenticatingRegister,
            SessionMachineState::AuthenticatingVerify => SessionStatus::AuthenticatingVerify,
            SessionMachineState::LoggingOut => SessionStatus::LoggingOut,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready_machine() -> SessionMachine {
        let mut machine = SessionMachine::new();
        machine
            .consume(&SessionMachineInput::RestoreComplete)
            .unwrap();
        machine
    }

    #[test]
    fn test_initial_state_is_initializing() {
        let machine = SessionMachine::new();
        assert_eq!(*machine.state(), SessionMachineState::Initializing);
    }

    #[test]
    fn test_restore_completes_to_ready() {
        let machine = ready_machine();
        assert_eq!(*machine.state(), SessionMachineState::Ready);
    }

    #[test]
    fn test_initializing_is_never_reentered() {
        let mut machine = ready_machine();

        // No input can take the machine back to Initializing
        let result = machine.consume(&SessionMachineInput::RestoreComplete);
        assert!(result.is_err());
        assert_eq!(*machine.state(), SessionMachineState::Ready);
    }

    #[test]
    fn test_login_operation_round_trip() {
        let mut machine = ready_machine();

        machine.consume(&SessionMachineInput::LoginAttempt).unwrap();
        assert_eq!(*machine.state(), SessionMachineState::AuthenticatingLogin);

        machine
            .consume(&SessionMachineInput::OperationComplete)
            .unwrap();
        assert_eq!(*machine.state(), SessionMachineState::Ready);
    }

    #[test]
    fn test_register_and_verify_round_trips() {
        let mut machine = ready_machine();

        machine
            .consume(&SessionMachineInput::RegisterAttempt)
            .unwrap();
        assert_eq!(
            *machine.state(),
            SessionMachineState::AuthenticatingRegister
        );
        machine
            .consume(&SessionMachineInput::OperationComplete)
            .unwrap();

        machine.consume(&SessionMachineInput::VerifyAttempt).unwrap();
        assert_eq!(*machine.state(), SessionMachineState::AuthenticatingVerify);
        machine
            .consume(&SessionMachineInput::OperationComplete)
            .unwrap();
        assert_eq!(*machine.state(), SessionMachineState::Ready);
    }

    #[test]
    fn test_logout_round_trip() {
        let mut machine = ready_machine();

        machine
            .consume(&SessionMachineInput::LogoutRequested)
            .unwrap();
        assert_eq!(*machine.state(), SessionMachineState::LoggingOut);

        machine
            .consume(&SessionMachineInput::OperationComplete)
            .unwrap();
        assert_eq!(*machine.state(), SessionMachineState::Ready);
    }

    #[test]
    fn test_no_second_operation_while_in_flight() {
        let mut machine = ready_machine();

        machine.consume(&SessionMachineInput::LoginAttempt).unwrap();

        // Every other operation start is rejected while login is in flight
        assert!(machine.consume(&SessionMachineInput::LoginAttempt).is_err());
        assert!(machine
            .consume(&SessionMachineInput::RegisterAttempt)
            .is_err());
        assert!(machine.consume(&SessionMachineInput::VerifyAttempt).is_err());
        assert!(machine
            .consume(&SessionMachineInput::LogoutRequested)
            .is_err());

        assert_eq!(*machine.state(), SessionMachineState::AuthenticatingLogin);
    }

    #[test]
    fn test_no_operation_before_restore() {
        let mut machine = SessionMachine::new();

        assert!(machine.consume(&SessionMachineInput::LoginAttempt).is_err());
        assert!(machine
            .consume(&SessionMachineInput::LogoutRequested)
            .is_err());
        assert_eq!(*machine.state(), SessionMachineState::Initializing);
    }

    #[test]
    fn test_session_status_conversion() {
        assert_eq!(
            SessionStatus::from(&SessionMachineState::Initializing),
            SessionStatus::Initializing
        );
        assert_eq!(
            SessionStatus::from(&SessionMachineState::Ready),
            SessionStatus::Ready
        );
        assert_eq!(
            SessionStatus::from(&SessionMachineState::AuthenticatingLogin),
            SessionStatus::AuthenticatingLogin
        );
        assert_eq!(
            SessionStatus::from(&SessionMachineState::AuthenticatingRegister),
            SessionStatus::AuthenticatingRegister
        );
        assert_eq!(
            SessionStatus::from(&SessionMachineState::AuthenticatingVerify),
            SessionStatus::AuthenticatingVerify
        );
        assert_eq!(
            SessionStatus::from(&SessionMachineState::LoggingOut),
            SessionStatus::LoggingOut
        );
    }

    #[test]
    fn test_session_status_is_ready() {
        assert!(SessionStatus::Ready.is_ready());
        assert!(!SessionStatus::Initializing.is_ready());
        assert!(!SessionStatus::AuthenticatingLogin.is_ready());
        assert!(!SessionStatus::LoggingOut.is_ready());
    }

    #[test]
    fn test_session_status_is_busy() {
        assert!(!SessionStatus::Initializing.is_busy());
        assert!(!SessionStatus::Ready.is_busy());
        assert!(SessionStatus::AuthenticatingLogin.is_busy());
        assert!(SessionStatus::AuthenticatingRegister.is_busy());
        assert!(SessionStatus::AuthenticatingVerify.is_busy());
        assert!(SessionStatus::LoggingOut.is_busy());
    }
}
