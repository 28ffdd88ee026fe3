//! # Signature Confirmation Watcher
//!
//! The hybrid push/pull watcher at the core of the engine. A push
//! subscription alone would miss a confirmation that landed before the
//! subscription existed; a pull query alone would have to poll. The
//! watcher therefore subscribes first, and only once the subscription is
//! acknowledged issues exactly one pull query: every confirmation landing
//! after the acknowledgment instant reaches the stream, and anything
//! earlier is caught by the query. Neither path alone has a blind spot
//! this way.

use crate::domain::CancellationScope;
use crate::error::{ConfirmationError, ConfirmationResult};
use crate::ports::outbound::{RpcQueryGateway, RpcSubscriptionsGateway};
use shared_types::{Commitment, SignatureNotification, SignatureStatus, TransactionSignature};
use std::future::pending;
use std::sync::Arc;
use tracing::{debug, warn};

/// Watches one signature until it reaches a target commitment or fails.
pub struct SignatureConfirmationWatcher<Q, S> {
    queries: Arc<Q>,
    subscriptions: Arc<S>,
}

impl<Q, S> SignatureConfirmationWatcher<Q, S>
where
    Q: RpcQueryGateway,
    S: RpcSubscriptionsGateway,
{
    /// Create a watcher over the given gateways.
    pub fn new(queries: Arc<Q>, subscriptions: Arc<S>) -> Self {
        Self {
            queries,
            subscriptions,
        }
    }

    /// Watch `signature` until it is observed at or above
    /// `target_commitment`.
    ///
    /// Settles `Ok(())` on an error-free observation at the target,
    /// `Err(TransactionFailed)` on an observed execution error, and
    /// `Err(Transport)` when the subscription or the query transport
    /// fails. Otherwise the future stays pending indefinitely; cancelling
    /// `scope` stops all underlying work without settling anything.
    pub async fn watch(
        &self,
        signature: TransactionSignature,
        target_commitment: Commitment,
        scope: &CancellationScope,
    ) -> ConfirmationResult<()> {
        // The subscription must be acknowledged before the one-shot pull
        // is issued; a status change landing between the two would
        // otherwise be invisible to both paths.
        let mut notifications = self
            .subscriptions
            .subscribe_signature_notifications(signature, target_commitment, scope)
            .await?;
        debug!(
            signature = %signature,
            commitment = %target_commitment,
            "signature subscription established"
        );

        let pull = async {
            let statuses = self
                .queries
                .get_signature_statuses(&[signature], scope)
                .await
                .map_err(ConfirmationError::Transport)?;

            match statuses.into_iter().next().flatten() {
                Some(SignatureStatus { err: Some(err), .. }) => {
                    Err(ConfirmationError::TransactionFailed { signature, err })
                }
                Some(status) if status.satisfies(target_commitment) => Ok(()),
                Some(status) => {
                    debug!(
                        signature = %signature,
                        status = ?status.confirmation_status,
                        "pulled status below target, deferring to push path"
                    );
                    pending().await
                }
                None => {
                    debug!(
                        signature = %signature,
                        "signature not yet known to the cluster, deferring to push path"
                    );
                    pending().await
                }
            }
        };

        let push = async {
            loop {
                match notifications.recv().await {
                    Some(SignatureNotification { err: Some(err) }) => {
                        return Err(ConfirmationError::TransactionFailed { signature, err });
                    }
                    Some(SignatureNotification { err: None }) => return Ok(()),
                    None => {
                        warn!(
                            signature = %signature,
                            "notification stream ended without a terminal status"
                        );
                        pending::<()>().await;
                    }
                }
            }
        };

        tokio::select! {
            biased;
            () = scope.cancelled() => pending().await,
            outcome = pull => outcome,
            outcome = push => outcome,
        }
    }
}
