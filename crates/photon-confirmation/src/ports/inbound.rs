//! # Inbound Ports
//!
//! The caller-facing contract of the confirmation engine.

use crate::domain::CancellationScope;
use crate::error::ConfirmationResult;
use async_trait::async_trait;
use shared_types::{Commitment, SignedTransaction};

/// Confirmation API - inbound port.
#[async_trait]
pub trait ConfirmationApi: Send + Sync {
    /// Wait until `transaction` reaches `target_commitment`, fails on
    /// chain, or can no longer land because its validity window closed.
    ///
    /// Fails fast, before any network traffic, with
    /// [`Aborted`](crate::error::ConfirmationError::Aborted) when
    /// `caller_scope` is already cancelled and with
    /// [`FeePayerUnsigned`](crate::error::ConfirmationError::FeePayerUnsigned)
    /// when the transaction carries no fee-payer signature.
    ///
    /// Cancelling `caller_scope` mid-flight stops all background work but
    /// does not settle the call; callers wanting an eager abort-to-error
    /// must race this future against their own cancellation signal.
    async fn confirm_transaction(
        &self,
        transaction: &SignedTransaction,
        target_commitment: Commitment,
        caller_scope: &CancellationScope,
    ) -> ConfirmationResult<()>;
}
