//! Call aggregate root

use crate::domain::call::entity::CallInfo;
use crate::domain::call::value_object::CallState;
use crate::domain::shared::error::DomainError;
use crate::domain::shared::result::Result;
use crate::domain::shared::value_objects::Handle;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Call aggregate root
///
/// Tracks the lifecycle of a single call. State changes go through
/// [`Call::transition_to`] so that invalid transitions are rejected.
#[derive(Debug, Clone)]
pub struct Call {
    id: Uuid,
    incoming: bool,
    original_handle: Option<Handle>,
    state: CallState,
    created_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
}

impl Call {
    /// Create a new call in the `New` state
    pub fn new(incoming: bool, original_handle: Option<Handle>) -> Self {
        Self::with_creation_time(incoming, original_handle, Utc::now())
    }

    pub fn with_creation_time(
        incoming: bool,
        original_handle: Option<Handle>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            incoming,
            original_handle,
            state: CallState::New,
            created_at,
            ended_at: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> CallState {
        self.state
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Move to `new_state`, returning the state that was left
    pub fn transition_to(&mut self, new_state: CallState) -> Result<CallState> {
        if !self.state.can_transition_to(&new_state) {
            return Err(DomainError::ValidationError(format!(
                "call {} cannot move from {} to {}",
                self.id, self.state, new_state
            )));
        }

        let old_state = self.state;
        self.state = new_state;
        if new_state.is_terminal() {
            self.ended_at = Some(Utc::now());
        }
        Ok(old_state)
    }
}

impl CallInfo for Call {
    fn is_incoming(&self) -> bool {
        self.incoming
    }

    fn original_handle(&self) -> Option<&Handle> {
        self.original_handle.as_ref()
    }

    fn creation_time_millis(&self) -> i64 {
        self.created_at.timestamp_millis()
    }

    fn age_millis(&self) -> i64 {
        let until = self.ended_at.unwrap_or_else(Utc::now);
        (until - self.created_at).num_milliseconds().max(0)
    }
}
