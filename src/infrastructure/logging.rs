//! Tracing setup and redaction of phone numbers in log output

use crate::config::LoggingConfig;
use sha1::{Digest, Sha1};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::EnvFilter;

static REVEAL_PII: AtomicBool = AtomicBool::new(false);

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `config.filter`. Calling this twice is
/// harmless; the second subscriber is ignored.
pub fn init(config: &LoggingConfig) {
    set_reveal_pii(config.reveal_pii);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

pub fn set_reveal_pii(reveal: bool) {
    REVEAL_PII.store(reveal, Ordering::Relaxed);
}

/// Wrap a phone number (or other personal data) for logging
pub fn pii(value: Option<&str>) -> Pii<'_> {
    Pii {
        value,
        reveal: REVEAL_PII.load(Ordering::Relaxed),
    }
}

/// Displays as a short SHA-1 fingerprint unless clear text was enabled,
/// so log lines about the same number can still be correlated.
#[derive(Clone, Copy)]
pub struct Pii<'a> {
    value: Option<&'a str>,
    reveal: bool,
}

impl fmt::Display for Pii<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            None => f.write_str("null"),
            Some(value) if self.reveal => f.write_str(value),
            Some(value) => {
                let digest = Sha1::digest(value.as_bytes());
                write!(f, "[{}]", &hex::encode(digest)[..8])
            }
        }
    }
}

impl fmt::Debug for Pii<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
