//! # Error Taxonomy
//!
//! Only failures that stop a scan before it starts live here. Per-port
//! failures are folded into [`crate::scan::outcome::PortState`] and the
//! unreachable-target abort is a [`crate::scan::report::ScanStatus`].

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("'{0}' is not a valid port number (expected 1-65535)")]
    InvalidPort(String),
    #[error("port 0 cannot be scanned")]
    ZeroPort,
    #[error("lower bound {start} is greater than upper bound {end}")]
    Inverted { start: u16, end: u16 },
}

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("could not resolve target '{target}': {reason}")]
    Resolution { target: String, reason: String },
    #[error("target '{target}' did not resolve to any address")]
    NoAddress { target: String },
    #[error("invalid port range: {0}")]
    InvalidRange(#[from] RangeError),
    #[error("concurrency limit must be at least 1")]
    InvalidConcurrency,
    #[error("probe timeout must be greater than zero")]
    InvalidTimeout,
}

impl ScanError {
    /// True for failures caused by the target string itself.
    pub fn is_resolution_failure(&self) -> bool {
        matches!(self, Self::Resolution { .. } | Self::NoAddress { .. })
    }
}
