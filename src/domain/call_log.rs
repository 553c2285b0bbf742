//! Call log domain model
//!
//! A call log entry captures the outcome of one finished call: who it was
//! with, how it ended up (incoming, outgoing, missed), when it started and
//! how long it lasted.

use crate::domain::shared::value_objects::RecordHandle;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Call log entry type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallType {
    /// Answered call placed by the far end
    Incoming,
    /// Call placed by the local user
    Outgoing,
    /// Incoming call that was never answered
    Missed,
}

impl CallType {
    /// Numeric code stored in the call log
    pub fn code(&self) -> i32 {
        match self {
            CallType::Incoming => 1,
            CallType::Outgoing => 2,
            CallType::Missed => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CallType::Incoming => "incoming",
            CallType::Outgoing => "outgoing",
            CallType::Missed => "missed",
        }
    }
}

/// Caller-ID presentation of the logged number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberPresentation {
    Allowed,
    Restricted,
    Unknown,
    Payphone,
}

impl NumberPresentation {
    /// Numeric code stored in the call log
    pub fn code(&self) -> i32 {
        match self {
            NumberPresentation::Allowed => 1,
            NumberPresentation::Restricted => 2,
            NumberPresentation::Unknown => 3,
            NumberPresentation::Payphone => 4,
        }
    }
}

/// Resolved caller details for a call log entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: Option<String>,
    pub number_label: Option<String>,
}

/// Immutable call log entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRecord {
    contact_info: Option<ContactInfo>,
    number: Option<String>,
    presentation: NumberPresentation,
    call_type: CallType,
    timestamp_millis: i64,
    duration_secs: i64,
}

impl CallRecord {
    /// Build a record from a call's creation time and age.
    ///
    /// Duration is whole seconds, truncated. A negative age is clamped to zero.
    pub fn new(
        contact_info: Option<ContactInfo>,
        number: Option<String>,
        presentation: NumberPresentation,
        call_type: CallType,
        start_millis: i64,
        age_millis: i64,
    ) -> Self {
        Self {
            contact_info,
            number,
            presentation,
            call_type,
            timestamp_millis: start_millis,
            duration_secs: age_millis.max(0) / 1000,
        }
    }

    pub fn contact_info(&self) -> Option<&ContactInfo> {
        self.contact_info.as_ref()
    }

    pub fn number(&self) -> Option<&str> {
        self.number.as_deref()
    }

    pub fn presentation(&self) -> NumberPresentation {
        self.presentation
    }

    pub fn call_type(&self) -> CallType {
        self.call_type
    }

    /// Start of the call, milliseconds since the epoch
    pub fn timestamp_millis(&self) -> i64 {
        self.timestamp_millis
    }

    pub fn duration_secs(&self) -> i64 {
        self.duration_secs
    }
}

/// Deployment policy for the call log
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallLogPolicy {
    /// Some carriers require that emergency calls never appear in the call
    /// log so they cannot be redialed by accident.
    pub allow_emergency_numbers: bool,
}

impl CallLogPolicy {
    pub fn new(allow_emergency_numbers: bool) -> Self {
        Self {
            allow_emergency_numbers,
        }
    }

    /// Eligibility filter: a record is logged unless it is an emergency call
    /// and the policy forbids those.
    pub fn is_ok_to_log(&self, is_emergency_number: bool) -> bool {
        !is_emergency_number || self.allow_emergency_numbers
    }
}

/// Result of writing one record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Persisted(RecordHandle),
    Failed,
}

impl WriteOutcome {
    pub fn handle(&self) -> Option<RecordHandle> {
        match self {
            WriteOutcome::Persisted(handle) => Some(*handle),
            WriteOutcome::Failed => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, WriteOutcome::Failed)
    }
}

/// Progress of a single submitted record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteState {
    Submitted,
    Writing,
    Persisted,
    Failed,
}

impl WriteState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, WriteState::Persisted | WriteState::Failed)
    }

    /// Records move forward only and are never retried
    pub fn can_transition_to(&self, next: WriteState) -> bool {
        matches!(
            (self, next),
            (WriteState::Submitted, WriteState::Writing)
                | (WriteState::Writing, WriteState::Persisted)
                | (WriteState::Writing, WriteState::Failed)
        )
    }
}

impl From<WriteOutcome> for WriteState {
    fn from(outcome: WriteOutcome) -> Self {
        match outcome {
            WriteOutcome::Persisted(_) => WriteState::Persisted,
            WriteOutcome::Failed => WriteState::Failed,
        }
    }
}

/// Failure reported by a call log store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Store is locked")]
    Locked,

    #[error("Record rejected: {0}")]
    Rejected(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Database error: {0}")]
    Database(String),
}

/// Persistent call history store
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CallLogStore: Send + Sync {
    /// Append a record, returning the handle the store assigned to it.
    ///
    /// May block for as long as the underlying medium needs.
    async fn add_call(&self, record: &CallRecord) -> Result<RecordHandle, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_age(age_millis: i64) -> CallRecord {
        CallRecord::new(
            None,
            Some("5551234567".to_string()),
            NumberPresentation::Allowed,
            CallType::Outgoing,
            1000,
            age_millis,
        )
    }

    #[test]
    fn test_record_creation() {
        let record = record_with_age(5000);

        assert_eq!(record.number(), Some("5551234567"));
        assert_eq!(record.call_type(), CallType::Outgoing);
        assert_eq!(record.presentation(), NumberPresentation::Allowed);
        assert_eq!(record.timestamp_millis(), 1000);
        assert_eq!(record.duration_secs(), 5);
        assert!(record.contact_info().is_none());
    }

    #[test]
    fn test_duration_truncates() {
        assert_eq!(record_with_age(0).duration_secs(), 0);
        assert_eq!(record_with_age(999).duration_secs(), 0);
        assert_eq!(record_with_age(1000).duration_secs(), 1);
        assert_eq!(record_with_age(1999).duration_secs(), 1);
        assert_eq!(record_with_age(61_500).duration_secs(), 61);
    }

    #[test]
    fn test_negative_age_clamped() {
        assert_eq!(record_with_age(-2500).duration_secs(), 0);
    }

    #[test]
    fn test_call_type_codes() {
        assert_eq!(CallType::Incoming.code(), 1);
        assert_eq!(CallType::Outgoing.code(), 2);
        assert_eq!(CallType::Missed.code(), 3);
        assert_eq!(CallType::Missed.as_str(), "missed");
    }

    #[test]
    fn test_presentation_codes() {
        assert_eq!(NumberPresentation::Allowed.code(), 1);
        assert_eq!(NumberPresentation::Payphone.code(), 4);
        assert_eq!(NumberPresentation::Restricted.code(), 2);
    }

    #[test]
    fn test_policy_eligibility() {
        let strict = CallLogPolicy::new(false);
        assert!(strict.is_ok_to_log(false));
        assert!(!strict.is_ok_to_log(true));

        let permissive = CallLogPolicy::new(true);
        assert!(permissive.is_ok_to_log(false));
        assert!(permissive.is_ok_to_log(true));

        assert_eq!(CallLogPolicy::default(), strict);
    }

    #[test]
    fn test_write_outcome() {
        let handle = RecordHandle::new();
        assert_eq!(WriteOutcome::Persisted(handle).handle(), Some(handle));
        assert!(WriteOutcome::Failed.is_failed());
        assert_eq!(WriteState::from(WriteOutcome::Failed), WriteState::Failed);
        assert!(WriteState::Persisted.is_terminal());
        assert!(!WriteState::Writing.is_terminal());
    }

    #[test]
    fn test_write_state_transitions() {
        assert!(WriteState::Submitted.can_transition_to(WriteState::Writing));
        assert!(WriteState::Writing.can_transition_to(WriteState::Persisted));
        assert!(WriteState::Writing.can_transition_to(WriteState::Failed));

        assert!(!WriteState::Submitted.can_transition_to(WriteState::Persisted));
        assert!(!WriteState::Failed.can_transition_to(WriteState::Writing));
        assert!(!WriteState::Persisted.can_transition_to(WriteState::Failed));
    }

    #[test]
    fn test_record_serializes() {
        let json = serde_json::to_value(record_with_age(2000)).unwrap();
        assert_eq!(json["call_type"], "outgoing");
        assert_eq!(json["presentation"], "allowed");
        assert_eq!(json["duration_secs"], 2);
    }
}
