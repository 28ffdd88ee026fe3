//! # Outbound Ports
//!
//! Traits for the injected RPC capabilities the engine consumes. The
//! engine owns no transport: one-shot queries arrive through
//! [`RpcQueryGateway`] and push subscriptions through
//! [`RpcSubscriptionsGateway`], mirroring the split between a client's
//! HTTP and websocket connections.
//!
//! Every method takes the caller's [`CancellationScope`]; implementations
//! must abort in-flight work when it is cancelled and must never invent a
//! response because of a cancellation.

use crate::domain::{CancellationScope, NotificationStream};
use async_trait::async_trait;
use shared_types::{
    Address, Commitment, EpochInfo, Nonce, SignatureNotification, SignatureStatus,
    TransactionSignature, TransportResult,
};

/// Pull-side RPC capability - outbound port.
#[async_trait]
pub trait RpcQueryGateway: Send + Sync {
    /// The current status of each signature, positionally. A `None` row
    /// means the cluster has not seen that signature.
    async fn get_signature_statuses(
        &self,
        signatures: &[TransactionSignature],
        scope: &CancellationScope,
    ) -> TransportResult<Vec<Option<SignatureStatus>>>;

    /// Current epoch info at `commitment`. The block height inside it
    /// drives the blockhash-lifetime expiry watcher.
    async fn get_epoch_info(
        &self,
        commitment: Commitment,
        scope: &CancellationScope,
    ) -> TransportResult<EpochInfo>;

    /// The value currently stored in `nonce_account`.
    async fn get_nonce_value(
        &self,
        nonce_account: Address,
        commitment: Commitment,
        scope: &CancellationScope,
    ) -> TransportResult<Nonce>;
}

/// Push-side RPC capability - outbound port.
#[async_trait]
pub trait RpcSubscriptionsGateway: Send + Sync {
    /// Subscribe to status notifications for one signature at
    /// `commitment`.
    ///
    /// The returned future resolves only once the server has acknowledged
    /// the subscription: every status change from that instant forward is
    /// guaranteed to appear on the stream. The signature watcher relies on
    /// that acknowledgment to close the lost-update window between
    /// subscribing and polling.
    async fn subscribe_signature_notifications(
        &self,
        signature: TransactionSignature,
        commitment: Commitment,
        scope: &CancellationScope,
    ) -> TransportResult<NotificationStream<SignatureNotification>>;

    /// Subscribe to the values successively stored in `nonce_account`,
    /// under the same acknowledgment contract as signature notifications.
    async fn subscribe_nonce_updates(
        &self,
        nonce_account: Address,
        commitment: Commitment,
        scope: &CancellationScope,
    ) -> TransportResult<NotificationStream<Nonce>>;
}
