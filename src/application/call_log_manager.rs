//! Call log manager
//!
//! Listens to call state changes and writes a call log entry for every call
//! that reaches a terminal state. Classification and the emergency-number
//! filter run synchronously on the notifying thread; the write itself is
//! queued to the [`CallLogWriter`](super::log_writer::CallLogWriter).

use crate::application::calls_manager::CallsManagerListener;
use crate::application::log_writer::{DispatchError, RecordSubmitter};
use crate::domain::call::{CallInfo, CallState, CallTransitionEvent};
use crate::domain::call_log::{CallLogPolicy, CallRecord, CallType, ContactInfo, NumberPresentation};
use crate::domain::phone_number::{log_number, EmergencyNumberClassifier};
use crate::infrastructure::logging::pii;
use crate::infrastructure::metrics;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// What the dispatcher did with a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Queued for writing
    Submitted,
    /// Dropped by the emergency-number filter
    Suppressed,
}

/// Classify a finished call from its direction and the state it left
pub fn classify_call(call: &dyn CallInfo, old_state: CallState) -> CallType {
    if !call.is_incoming() {
        CallType::Outgoing
    } else if old_state == CallState::Ringing {
        CallType::Missed
    } else {
        CallType::Incoming
    }
}

pub struct CallLogManager {
    policy: CallLogPolicy,
    emergency_numbers: Arc<dyn EmergencyNumberClassifier>,
    submitter: Arc<dyn RecordSubmitter>,
}

impl CallLogManager {
    pub fn new(
        policy: CallLogPolicy,
        emergency_numbers: Arc<dyn EmergencyNumberClassifier>,
        submitter: Arc<dyn RecordSubmitter>,
    ) -> Self {
        Self {
            policy,
            emergency_numbers,
            submitter,
        }
    }

    /// Build the call log entry for `call`
    pub fn build_record(call: &dyn CallInfo, call_type: CallType) -> CallRecord {
        // TODO: resolve caller details once the call carries caller info.
        let contact_info: Option<ContactInfo> = None;
        let number = log_number(call);
        debug!("logNumber set to: {}", pii(number.as_deref()));

        let presentation = Self::presentation(call, contact_info.as_ref());

        CallRecord::new(
            contact_info,
            number,
            presentation,
            call_type,
            call.creation_time_millis(),
            call.age_millis(),
        )
    }

    /// Number presentation for the entry.
    ///
    /// Calls do not carry presentation yet, so every entry is `Allowed`.
    fn presentation(_call: &dyn CallInfo, _contact_info: Option<&ContactInfo>) -> NumberPresentation {
        NumberPresentation::Allowed
    }

    /// Apply the emergency-number filter and queue the record.
    ///
    /// Returns as soon as the record is queued; the write happens later.
    pub fn log_call(&self, record: CallRecord) -> Result<Dispatch, DispatchError> {
        // A call without a number is never an emergency call.
        let is_emergency = record
            .number()
            .is_some_and(|number| self.emergency_numbers.is_local_emergency_number(number));

        if !self.policy.is_ok_to_log(is_emergency) {
            debug!("Not adding emergency call to call log.");
            metrics::record_call_suppressed();
            return Ok(Dispatch::Suppressed);
        }

        debug!(
            number = %pii(record.number()),
            presentation = ?record.presentation(),
            call_type = record.call_type().as_str(),
            start = record.timestamp_millis(),
            duration = record.duration_secs(),
            "Logging call log entry"
        );

        self.submitter.submit(vec![record])?;
        Ok(Dispatch::Submitted)
    }

    /// Handle one transition; `None` when it is not a terminal one
    pub fn handle_transition(
        &self,
        event: CallTransitionEvent<'_>,
    ) -> Result<Option<Dispatch>, DispatchError> {
        if !event.is_terminal() {
            return Ok(None);
        }

        let call_type = classify_call(event.call, event.old_state);
        let record = Self::build_record(event.call, call_type);
        self.log_call(record).map(Some)
    }
}

impl CallsManagerListener for CallLogManager {
    fn on_call_state_changed(&self, call: &dyn CallInfo, old_state: CallState, new_state: CallState) {
        let event = CallTransitionEvent::new(call, old_state, new_state);

        match std::panic::catch_unwind(AssertUnwindSafe(|| self.handle_transition(event))) {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => warn!(error = %e, "Call log entry not queued"),
            Err(_) => error!("Call log manager panicked handling {:?}", event),
        }
    }
}
