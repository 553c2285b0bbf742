//! Call value objects

use serde::{Deserialize, Serialize};
use std::fmt;

/// Call state as driven by the call-state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallState {
    /// Call object created, nothing sent yet
    New,
    /// Outgoing call is being set up
    Connecting,
    /// Waiting for the user to confirm pre-dial actions
    PreDialWait,
    /// Outgoing call has been sent, waiting for the far end
    Dialing,
    /// Incoming call is alerting the user
    Ringing,
    /// Media is flowing
    Active,
    /// Call is on hold
    OnHold,
    /// Call was connected (or attempted) and has now ended
    Disconnected,
    /// Call was torn down before it ever got going
    Aborted,
}

impl CallState {
    /// Terminal states are the only ones that produce a call log entry
    pub fn is_terminal(&self) -> bool {
        matches!(self, CallState::Disconnected | CallState::Aborted)
    }

    /// Check if state transition is valid
    pub fn can_transition_to(&self, new_state: &CallState) -> bool {
        use CallState::*;

        match (self, new_state) {
            (Disconnected | Aborted, _) => false,
            (_, Aborted) => true,
            (_, Disconnected) => true,

            (New, Connecting | PreDialWait | Dialing | Ringing) => true,
            (Connecting, PreDialWait | Dialing) => true,
            (PreDialWait, Dialing) => true,
            (Dialing, Active) => true,
            (Ringing, Active) => true,
            (Active, OnHold) => true,
            (OnHold, Active) => true,

            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CallState::New => "NEW",
            CallState::Connecting => "CONNECTING",
            CallState::PreDialWait => "PRE_DIAL_WAIT",
            CallState::Dialing => "DIALING",
            CallState::Ringing => "RINGING",
            CallState::Active => "ACTIVE",
            CallState::OnHold => "ON_HOLD",
            CallState::Disconnected => "DISCONNECTED",
            CallState::Aborted => "ABORTED",
        }
    }
}

impl fmt::Display for CallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(CallState::Disconnected.is_terminal());
        assert!(CallState::Aborted.is_terminal());
        assert!(!CallState::Ringing.is_terminal());
        assert!(!CallState::Active.is_terminal());
        assert!(!CallState::New.is_terminal());
    }

    #[test]
    fn test_valid_state_transitions() {
        assert!(CallState::New.can_transition_to(&CallState::Ringing));
        assert!(CallState::New.can_transition_to(&CallState::Dialing));
        assert!(CallState::Ringing.can_transition_to(&CallState::Active));
        assert!(CallState::Ringing.can_transition_to(&CallState::Disconnected));
        assert!(CallState::Dialing.can_transition_to(&CallState::Aborted));
        assert!(CallState::Active.can_transition_to(&CallState::OnHold));
        assert!(CallState::OnHold.can_transition_to(&CallState::Active));
    }

    #[test]
    fn test_invalid_state_transitions() {
        assert!(!CallState::Disconnected.can_transition_to(&CallState::Active));
        assert!(!CallState::Aborted.can_transition_to(&CallState::Disconnected));
        assert!(!CallState::New.can_transition_to(&CallState::Active));
        assert!(!CallState::Ringing.can_transition_to(&CallState::Dialing));
    }
}
