//! # Confirmation Errors
//!
//! The failure taxonomy surfaced to callers of the confirmation engine.
//!
//! Three tiers exist, and only two of them appear here:
//!
//! - **Precondition failures** (`Aborted`, `FeePayerUnsigned`) are raised
//!   before any network traffic.
//! - **Authoritative failures** (`TransactionFailed`, `Transport`,
//!   `LifetimeExpired`) settle an in-flight confirmation.
//! - Advisory failures (transport errors from a lifetime-expiry watcher)
//!   are deliberately absent: the coordinator discards them.

use shared_types::{Address, LifetimeKind, TransactionError, TransactionSignature, TransportError};
use thiserror::Error;

/// Errors that can settle (or pre-empt) a confirmation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfirmationError {
    /// The caller's scope was already cancelled before any work began.
    #[error("Confirmation aborted: the caller's scope was cancelled before any work began")]
    Aborted,

    /// The signature map has no entry for the fee payer, so there is no
    /// canonical signature to track.
    #[error(
        "Could not determine this transaction's signature. \
         Make sure that the transaction has been signed by its fee payer."
    )]
    FeePayerUnsigned {
        /// The fee payer whose signature is missing.
        fee_payer: Address,
    },

    /// The transaction executed on chain and failed.
    #[error("The transaction with signature `{signature}` failed: {err}")]
    TransactionFailed {
        /// The tracking signature of the failed transaction.
        signature: TransactionSignature,
        /// The failure payload reported by the cluster.
        err: TransactionError,
    },

    /// A transport failure on the authoritative signature-watcher path.
    #[error("Confirmation transport failure: {0}")]
    Transport(#[from] TransportError),

    /// The transaction's validity window closed before it reached the
    /// requested commitment; it can no longer land.
    #[error("The transaction's {kind} lifetime expired before it was confirmed")]
    LifetimeExpired {
        /// Which lifetime mechanism expired.
        kind: LifetimeKind,
    },
}

/// Result alias for confirmation operations.
pub type ConfirmationResult<T> = Result<T, ConfirmationError>;
