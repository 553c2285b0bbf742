//! calllog - Call history logging for a telephony stack
//!
//! Watches call state transitions, classifies each finished call as
//! incoming, outgoing or missed, filters out emergency calls when the
//! deployment requires it, and writes the result to a call log store from
//! a background worker pool so the call-control path never waits on I/O.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types
pub use application::{CallLogManager, CallLogWriter, CallsManager, CallsManagerListener, Dispatch};
pub use domain::call_log::{CallLogPolicy, CallLogStore, CallRecord, CallType, NumberPresentation};
pub use domain::shared::error::DomainError;
pub use domain::shared::result::Result;
