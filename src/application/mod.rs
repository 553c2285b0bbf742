//! Application layer - Use cases and application services
//!
//! This layer orchestrates domain objects to fulfill use cases:
//! - Fanning call state changes out to listeners
//! - Turning finished calls into call log entries
//! - Writing those entries off the calling thread

pub mod call_log_manager;
pub mod calls_manager;
pub mod log_writer;

pub use call_log_manager::{classify_call, CallLogManager, Dispatch};
pub use calls_manager::{CallsManager, CallsManagerListener};
pub use log_writer::{CallLogWriter, DispatchError, RecordSubmitter, WriterStatsSnapshot};
