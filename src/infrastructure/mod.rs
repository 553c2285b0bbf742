//! Infrastructure layer - Technical implementations
//!
//! This layer contains:
//! - Call log store implementations (memory, JSON lines file, PostgreSQL)
//! - Tracing setup and phone number redaction
//! - Metrics

pub mod logging;
pub mod metrics;
pub mod persistence;
