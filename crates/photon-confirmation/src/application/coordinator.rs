//! # Confirmation Coordinator
//!
//! Races the signature watcher against the applicable lifetime-expiry
//! watcher under one child scope and settles exactly one outcome.
//!
//! The two signals are not trusted equally. The signature watcher is
//! authoritative for success and failure alike. The expiry watcher is
//! advisory: its success means the validity window closed and becomes a
//! lifetime-expired failure, while its transport failures are discarded.
//! A failed expiry probe is not evidence that the window is still open,
//! and such probes fail transiently all the time.

use crate::application::blockheight_watcher::BlockheightExceedanceWatcher;
use crate::application::nonce_watcher::NonceInvalidationWatcher;
use crate::application::signature_watcher::SignatureConfirmationWatcher;
use crate::config::ConfirmationConfig;
use crate::domain::CancellationScope;
use crate::error::{ConfirmationError, ConfirmationResult};
use crate::ports::inbound::ConfirmationApi;
use crate::ports::outbound::{RpcQueryGateway, RpcSubscriptionsGateway};
use async_trait::async_trait;
use shared_types::{
    Commitment, LifetimeKind, SignedTransaction, TransactionLifetime, TransactionSignature,
    TransportResult,
};
use std::future::{pending, Future};
use std::sync::Arc;
use tracing::{debug, warn};

/// Cancels the wrapped scope when dropped, so every exit path releases
/// the watchers' subscriptions and polling, including a caller dropping
/// the in-flight future.
struct CancelOnDrop(CancellationScope);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.cancel();
    }
}

/// The confirmation engine's application service.
///
/// One instance is shared across confirmations; each call derives its own
/// child scope and watchers, and nothing outlives the call.
pub struct ConfirmationService<Q, S> {
    config: ConfirmationConfig,
    queries: Arc<Q>,
    subscriptions: Arc<S>,
}

impl<Q, S> ConfirmationService<Q, S>
where
    Q: RpcQueryGateway,
    S: RpcSubscriptionsGateway,
{
    /// Create a service over the given gateways.
    pub fn new(config: ConfirmationConfig, queries: Arc<Q>, subscriptions: Arc<S>) -> Self {
        Self {
            config,
            queries,
            subscriptions,
        }
    }

    /// Wait until `transaction` reaches `target_commitment`, fails on
    /// chain, or can no longer land.
    ///
    /// See [`ConfirmationApi::confirm_transaction`] for the full
    /// contract; this is the same operation without the trait object.
    pub async fn confirm_transaction(
        &self,
        transaction: &SignedTransaction,
        target_commitment: Commitment,
        caller_scope: &CancellationScope,
    ) -> ConfirmationResult<()> {
        if caller_scope.is_cancelled() {
            return Err(ConfirmationError::Aborted);
        }
        let signature = *transaction
            .tracking_signature()
            .ok_or(ConfirmationError::FeePayerUnsigned {
                fee_payer: transaction.fee_payer,
            })?;

        let lifetime_kind = transaction.lifetime.kind();
        debug!(
            signature = %signature,
            commitment = %target_commitment,
            lifetime = %lifetime_kind,
            "confirmation started"
        );

        let child_scope = caller_scope.child();
        let _guard = CancelOnDrop(child_scope.clone());

        let outcome = match &transaction.lifetime {
            TransactionLifetime::Blockhash {
                last_valid_block_height,
                ..
            } => {
                let expiry_watcher = BlockheightExceedanceWatcher::new(
                    self.queries.clone(),
                    self.config.block_height_poll_interval(),
                );
                self.race_watchers(
                    signature,
                    target_commitment,
                    &child_scope,
                    lifetime_kind,
                    expiry_watcher.watch(*last_valid_block_height, target_commitment, &child_scope),
                )
                .await
            }
            TransactionLifetime::DurableNonce {
                nonce_account,
                nonce,
            } => {
                let expiry_watcher =
                    NonceInvalidationWatcher::new(self.queries.clone(), self.subscriptions.clone());
                self.race_watchers(
                    signature,
                    target_commitment,
                    &child_scope,
                    lifetime_kind,
                    expiry_watcher.watch(*nonce_account, *nonce, target_commitment, &child_scope),
                )
                .await
            }
        };

        match &outcome {
            Ok(()) => debug!(signature = %signature, "confirmation succeeded"),
            Err(err) => debug!(signature = %signature, error = %err, "confirmation settled with failure"),
        }

        // Stop both watchers and release their subscriptions and polling
        // before handing the outcome back; the guard above covers the
        // paths that never reach this line.
        child_scope.cancel();
        outcome
    }

    /// Confirm at the configured default commitment.
    pub async fn confirm_with_default_commitment(
        &self,
        transaction: &SignedTransaction,
        caller_scope: &CancellationScope,
    ) -> ConfirmationResult<()> {
        self.confirm_transaction(transaction, self.config.default_commitment, caller_scope)
            .await
    }

    /// Race the authoritative signature watcher against an advisory
    /// expiry watcher. Returns the first settlement allowed by the trust
    /// policy; never settles on cancellation.
    async fn race_watchers(
        &self,
        signature: TransactionSignature,
        target_commitment: Commitment,
        scope: &CancellationScope,
        lifetime_kind: LifetimeKind,
        expiry: impl Future<Output = TransportResult<()>>,
    ) -> ConfirmationResult<()> {
        let signature_watcher =
            SignatureConfirmationWatcher::new(self.queries.clone(), self.subscriptions.clone());
        let authoritative = signature_watcher.watch(signature, target_commitment, scope);

        let advisory = async {
            match expiry.await {
                Ok(()) => {}
                Err(err) => {
                    warn!(
                        lifetime = %lifetime_kind,
                        error = %err,
                        "expiry watcher transport failure discarded; waiting on the signature watcher alone"
                    );
                    pending::<()>().await;
                }
            }
        };

        // Biased so that a signature settlement always beats an expiry
        // signal arriving in the same poll.
        tokio::select! {
            biased;
            outcome = authoritative => outcome,
            () = advisory => Err(ConfirmationError::LifetimeExpired {
                kind: lifetime_kind,
            }),
        }
    }
}

#[async_trait]
impl<Q, S> ConfirmationApi for ConfirmationService<Q, S>
where
    Q: RpcQueryGateway,
    S: RpcSubscriptionsGateway,
{
    async fn confirm_transaction(
        &self,
        transaction: &SignedTransaction,
        target_commitment: Commitment,
        caller_scope: &CancellationScope,
    ) -> ConfirmationResult<()> {
        self.confirm_transaction(transaction, target_commitment, caller_scope)
            .await
    }
}
