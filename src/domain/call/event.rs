//! Call domain events

use crate::domain::call::entity::CallInfo;
use crate::domain::call::value_object::CallState;

/// A single state transition reported by the call-state machine.
///
/// Borrowed from the call for the duration of the notification and never stored.
#[derive(Clone, Copy)]
pub struct CallTransitionEvent<'a> {
    pub call: &'a dyn CallInfo,
    pub old_state: CallState,
    pub new_state: CallState,
}

impl<'a> CallTransitionEvent<'a> {
    pub fn new(call: &'a dyn CallInfo, old_state: CallState, new_state: CallState) -> Self {
        Self {
            call,
            old_state,
            new_state,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.new_state.is_terminal()
    }
}

impl std::fmt::Debug for CallTransitionEvent<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallTransitionEvent")
            .field("incoming", &self.call.is_incoming())
            .field("old_state", &self.old_state)
            .field("new_state", &self.new_state)
            .finish()
    }
}
