//! Shared value objects used across the call log context

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::error::DomainError;

/// Identifier assigned by a call log store to a persisted record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordHandle(Uuid);

impl RecordHandle {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RecordHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "calllog:{}", self.0)
    }
}

/// Address a call was placed to or received from, e.g. `tel:555-1234`
/// or `sip:alice@example.com`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Handle {
    scheme: String,
    scheme_specific_part: String,
}

impl Handle {
    pub const SCHEME_TEL: &'static str = "tel";
    pub const SCHEME_SIP: &'static str = "sip";

    pub fn new(scheme: impl Into<String>, scheme_specific_part: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            scheme_specific_part: scheme_specific_part.into(),
        }
    }

    pub fn tel(number: impl Into<String>) -> Self {
        Self::new(Self::SCHEME_TEL, number)
    }

    pub fn sip(address: impl Into<String>) -> Self {
        Self::new(Self::SCHEME_SIP, address)
    }

    /// Parse `scheme:address`; the scheme is lowercased
    pub fn parse(handle: &str) -> Result<Self, DomainError> {
        let (scheme, rest) = handle
            .split_once(':')
            .ok_or_else(|| DomainError::InvalidHandle(format!("missing scheme in '{}'", handle)))?;

        if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphanumeric() || "+-.".contains(c)) {
            return Err(DomainError::InvalidHandle(format!("bad scheme '{}'", scheme)));
        }

        if rest.is_empty() {
            return Err(DomainError::InvalidHandle(format!("empty address in '{}'", handle)));
        }

        Ok(Self::new(scheme.to_ascii_lowercase(), rest))
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn scheme_specific_part(&self) -> &str {
        &self.scheme_specific_part
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.scheme, self.scheme_specific_part)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_parse() {
        let handle = Handle::parse("tel:555-123-4567").unwrap();
        assert_eq!(handle.scheme(), "tel");
        assert_eq!(handle.scheme_specific_part(), "555-123-4567");

        let sip = Handle::parse("SIP:alice@example.com").unwrap();
        assert_eq!(sip.scheme(), "sip");
        assert_eq!(sip.scheme_specific_part(), "alice@example.com");
    }

    #[test]
    fn test_handle_parse_rejects_malformed() {
        assert!(Handle::parse("5551234").is_err());
        assert!(Handle::parse(":5551234").is_err());
        assert!(Handle::parse("tel:").is_err());
    }

    #[test]
    fn test_handle_display() {
        assert_eq!(Handle::tel("911").to_string(), "tel:911");
        assert_eq!(Handle::sip("bob@example.com").to_string(), "sip:bob@example.com");
    }

    #[test]
    fn test_record_handle_display() {
        let uuid = Uuid::nil();
        let handle = RecordHandle::from_uuid(uuid);
        assert_eq!(handle.as_uuid(), uuid);
        assert_eq!(handle.to_string(), format!("calllog:{}", uuid));
    }
}
