//! # Nonce Invalidation Watcher
//!
//! Expiry watcher for durable-nonce transactions. Such a transaction
//! stays valid exactly as long as the on-chain nonce account still holds
//! the value captured at signing time; any other value means the
//! transaction either landed or was superseded. The watcher uses the same
//! subscribe-then-read ordering as the signature watcher so that a nonce
//! advance landing between the read and the subscription cannot slip
//! through unobserved.

use crate::domain::CancellationScope;
use crate::ports::outbound::{RpcQueryGateway, RpcSubscriptionsGateway};
use shared_types::{Address, Commitment, Nonce, TransportResult};
use std::future::pending;
use std::sync::Arc;
use tracing::{debug, warn};

/// Watches a nonce account until its value moves off the captured one.
pub struct NonceInvalidationWatcher<Q, S> {
    queries: Arc<Q>,
    subscriptions: Arc<S>,
}

impl<Q, S> NonceInvalidationWatcher<Q, S>
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

    /// Watch for `nonce_account` holding anything other than
    /// `expected_nonce`.
    ///
    /// Settles `Ok(())` once a differing value is observed, meaning the
    /// transaction's window is closed, and `Err` on a transport failure
    /// from either the subscription or the read. While the stored value
    /// still matches, the watch stays pending; cancelling `scope` stops
    /// all underlying work without settling.
    pub async fn watch(
        &self,
        nonce_account: Address,
        expected_nonce: Nonce,
        commitment: Commitment,
        scope: &CancellationScope,
    ) -> TransportResult<()> {
        let mut updates = self
            .subscriptions
            .subscribe_nonce_updates(nonce_account, commitment, scope)
            .await?;
        debug!(commitment = %commitment, "nonce subscription established");

        let read = async {
            let value = self
                .queries
                .get_nonce_value(nonce_account, commitment, scope)
                .await?;
            if value != expected_nonce {
                debug!("stored nonce differs from the captured value");
                return Ok(());
            }
            debug!("stored nonce still matches, deferring to push path");
            pending().await
        };

        let push = async {
            loop {
                match updates.recv().await {
                    Some(value) if value != expected_nonce => return Ok(()),
                    Some(_) => {}
                    None => {
                        warn!("nonce update stream ended without an invalidation");
                        pending::<()>().await;
                    }
                }
            }
        };

        tokio::select! {
            biased;
            () = scope.cancelled() => pending().await,
            outcome = read => outcome,
            outcome = push => outcome,
        }
    }
}
