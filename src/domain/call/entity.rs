//! Call entities

use crate::domain::shared::value_objects::Handle;

/// Read-only view of a call as seen by the call log.
///
/// Implemented by whatever owns call state; the call log never mutates it.
pub trait CallInfo: Send + Sync {
    /// Whether the far end placed the call
    fn is_incoming(&self) -> bool;

    /// Address originally dialed or presented, if any
    fn original_handle(&self) -> Option<&Handle>;

    /// Creation time in milliseconds since the epoch
    fn creation_time_millis(&self) -> i64;

    /// Milliseconds elapsed since creation
    fn age_millis(&self) -> i64;
}
