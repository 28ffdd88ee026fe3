//! # Error Types
//!
//! Defines error types shared across Photon-Client crates.

use thiserror::Error;

/// A transport-level failure surfaced by an injected RPC capability.
///
/// Carries only a human-readable reason: the engine never branches on the
/// cause of a transport failure, it only decides whether the failing path
/// was authoritative or advisory.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("transport error: {reason}")]
pub struct TransportError {
    /// What the transport reported.
    pub reason: String,
}

impl TransportError {
    /// Create a transport error from any displayable reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Result alias for operations that can fail at the transport layer.
pub type TransportResult<T> = Result<T, TransportError>;
