//! # Mock RPC Gateways
//!
//! Scriptable in-memory implementations of the outbound ports. Tests
//! preload responses, gate subscription establishment, and inspect the
//! recorded calls to assert ordering and the fail-fast "zero network
//! traffic" properties.

use crate::domain::{notification_channel, CancellationScope, NotificationSender, NotificationStream};
use crate::ports::outbound::{RpcQueryGateway, RpcSubscriptionsGateway};
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use shared_types::{
    Address, Commitment, EpochInfo, Nonce, SignatureNotification, SignatureStatus,
    TransactionSignature, TransportError, TransportResult,
};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Notify;

/// One recorded call against [`MockRpcQueries`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedQuery {
    /// A signature-status query.
    SignatureStatuses {
        /// The signatures that were asked about.
        signatures: Vec<TransactionSignature>,
    },
    /// An epoch-info query.
    EpochInfo {
        /// The commitment the query was issued at.
        commitment: Commitment,
    },
    /// A nonce-account read.
    NonceValue {
        /// The nonce account that was read.
        nonce_account: Address,
        /// The commitment the read was issued at.
        commitment: Commitment,
    },
}

/// Scriptable pull-side gateway.
///
/// Responses are consumed queue-style, one per call. A call that finds
/// its queue empty parks until the scope is cancelled and then fails the
/// way an aborted request would.
#[derive(Default)]
pub struct MockRpcQueries {
    signature_status_responses: Mutex<VecDeque<TransportResult<Vec<Option<SignatureStatus>>>>>,
    epoch_info_responses: Mutex<VecDeque<TransportResult<EpochInfo>>>,
    nonce_value_responses: Mutex<VecDeque<TransportResult<Nonce>>>,
    calls: RwLock<Vec<RecordedQuery>>,
}

impl MockRpcQueries {
    /// Create a mock with nothing scripted.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the next signature-status response.
    pub fn push_signature_statuses(
        &self,
        response: TransportResult<Vec<Option<SignatureStatus>>>,
    ) {
        self.signature_status_responses.lock().push_back(response);
    }

    /// Script the next epoch-info response.
    pub fn push_epoch_info(&self, response: TransportResult<EpochInfo>) {
        self.epoch_info_responses.lock().push_back(response);
    }

    /// Script the next nonce-account read response.
    pub fn push_nonce_value(&self, response: TransportResult<Nonce>) {
        self.nonce_value_responses.lock().push_back(response);
    }

    /// Every call made so far, in order.
    #[must_use]
    pub fn recorded_calls(&self) -> Vec<RecordedQuery> {
        self.calls.read().clone()
    }

    /// Number of calls made so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.read().len()
    }

    async fn park_until_cancelled<T>(scope: &CancellationScope) -> TransportResult<T> {
        scope.cancelled().await;
        Err(TransportError::new("request aborted by caller"))
    }
}

#[async_trait]
impl RpcQueryGateway for MockRpcQueries {
    async fn get_signature_statuses(
        &self,
        signatures: &[TransactionSignature],
        scope: &CancellationScope,
    ) -> TransportResult<Vec<Option<SignatureStatus>>> {
        self.calls.write().push(RecordedQuery::SignatureStatuses {
            signatures: signatures.to_vec(),
        });
        let scripted = self.signature_status_responses.lock().pop_front();
        match scripted {
            Some(response) => response,
            None => Self::park_until_cancelled(scope).await,
        }
    }

    async fn get_epoch_info(
        &self,
        commitment: Commitment,
        scope: &CancellationScope,
    ) -> TransportResult<EpochInfo> {
        self.calls
            .write()
            .push(RecordedQuery::EpochInfo { commitment });
        let scripted = self.epoch_info_responses.lock().pop_front();
        match scripted {
            Some(response) => response,
            None => Self::park_until_cancelled(scope).await,
        }
    }

    async fn get_nonce_value(
        &self,
        nonce_account: Address,
        commitment: Commitment,
        scope: &CancellationScope,
    ) -> TransportResult<Nonce> {
        self.calls.write().push(RecordedQuery::NonceValue {
            nonce_account,
            commitment,
        });
        let scripted = self.nonce_value_responses.lock().pop_front();
        match scripted {
            Some(response) => response,
            None => Self::park_until_cancelled(scope).await,
        }
    }
}

/// One recorded call against [`MockRpcSubscriptions`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedSubscribe {
    /// A signature-notification subscription.
    SignatureNotifications {
        /// The watched signature.
        signature: TransactionSignature,
        /// The commitment the subscription was opened at.
        commitment: Commitment,
    },
    /// A nonce-update subscription.
    NonceUpdates {
        /// The watched nonce account.
        nonce_account: Address,
        /// The commitment the subscription was opened at.
        commitment: Commitment,
    },
}

#[derive(Default)]
struct SubscriptionsState {
    gate: Option<Arc<Notify>>,
    establishment_failures: VecDeque<TransportError>,
    signature_senders: Vec<NotificationSender<SignatureNotification>>,
    nonce_senders: Vec<NotificationSender<Nonce>>,
}

/// Scriptable push-side gateway.
///
/// Hands out streams backed by [`notification_channel`]; tests push
/// notifications through the retained sender halves. Establishment can be
/// gated so tests can hold a subscription un-acknowledged while asserting
/// what the engine does in the meantime.
#[derive(Default)]
pub struct MockRpcSubscriptions {
    state: Mutex<SubscriptionsState>,
    calls: RwLock<Vec<RecordedSubscribe>>,
}

impl MockRpcSubscriptions {
    /// Create a mock with ungated establishment and nothing scripted.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gate subscription establishment.
    ///
    /// Until the returned [`Notify`] is notified, `subscribe_*` futures
    /// record their call and then wait; each `notify_one` admits one
    /// establishment.
    pub fn gate_establishment(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.state.lock().gate = Some(gate.clone());
        gate
    }

    /// Script the next establishment to fail with `err`.
    pub fn fail_next_establishment(&self, err: TransportError) {
        self.state.lock().establishment_failures.push_back(err);
    }

    /// Push a notification to every live signature subscription. Returns
    /// `false` when no subscriber received it.
    pub fn push_signature_notification(&self, notification: SignatureNotification) -> bool {
        let senders = self.state.lock().signature_senders.clone();
        senders
            .iter()
            .fold(false, |delivered, sender| sender.send(notification.clone()) || delivered)
    }

    /// Push a nonce value to every live nonce subscription. Returns
    /// `false` when no subscriber received it.
    pub fn push_nonce_update(&self, value: Nonce) -> bool {
        let senders = self.state.lock().nonce_senders.clone();
        senders
            .iter()
            .fold(false, |delivered, sender| sender.send(value) || delivered)
    }

    /// Every subscribe call made so far, in order.
    #[must_use]
    pub fn recorded_subscribes(&self) -> Vec<RecordedSubscribe> {
        self.calls.read().clone()
    }

    /// Number of subscribe calls made so far.
    #[must_use]
    pub fn subscribe_count(&self) -> usize {
        self.calls.read().len()
    }

    async fn admit(&self) -> TransportResult<()> {
        let gate = self.state.lock().gate.clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        match self.state.lock().establishment_failures.pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RpcSubscriptionsGateway for MockRpcSubscriptions {
    async fn subscribe_signature_notifications(
        &self,
        signature: TransactionSignature,
        commitment: Commitment,
        scope: &CancellationScope,
    ) -> TransportResult<NotificationStream<SignatureNotification>> {
        self.calls.write().push(RecordedSubscribe::SignatureNotifications {
            signature,
            commitment,
        });
        self.admit().await?;
        let (sender, stream) = notification_channel(scope);
        self.state.lock().signature_senders.push(sender);
        Ok(stream)
    }

    async fn subscribe_nonce_updates(
        &self,
        nonce_account: Address,
        commitment: Commitment,
        scope: &CancellationScope,
    ) -> TransportResult<NotificationStream<Nonce>> {
        self.calls.write().push(RecordedSubscribe::NonceUpdates {
            nonce_account,
            commitment,
        });
        self.admit().await?;
        let (sender, stream) = notification_channel(scope);
        self.state.lock().nonce_senders.push(sender);
        Ok(stream)
    }
}
