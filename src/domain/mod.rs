//! Domain layer - Core call log rules
//!
//! This layer contains:
//! - Value Objects: call states, record types, handles
//! - Aggregates: the call as observed by the call log
//! - Policies: the emergency-number eligibility filter
//! - Repository Interfaces: the call log store port

pub mod call;
pub mod call_log;
pub mod phone_number;
pub mod shared;

// Re-export commonly used types
pub use shared::{DomainError, Result};
