//! # Confirmation Flow Tests
//!
//! End-to-end confirmation runs driven through `ConfirmationApi` with
//! scripted mock gateways.
//!
//! ## Flows Tested:
//!
//! 1. **Push path**: subscription acknowledged, pull defers, a later
//!    notification settles success.
//! 2. **Pull path**: the one-shot status query already satisfies the
//!    target, so no notification is needed.
//! 3. **Expiry paths**: blockheight exceedance and nonce invalidation
//!    settle lifetime-expired failures while the signature stays unseen.
//! 4. **Ordering**: no status pull is issued until the subscription is
//!    acknowledged.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    use photon_confirmation::adapters::{
        MockRpcQueries, MockRpcSubscriptions, RecordedQuery, RecordedSubscribe,
    };
    use photon_confirmation::{
        CancellationScope, ConfirmationApi, ConfirmationConfig, ConfirmationError,
        ConfirmationService,
    };
    use shared_types::{
        Address, BlockHeight, Commitment, EpochInfo, LifetimeKind, Nonce, SignatureNotification,
        SignatureStatus, SignedTransaction, TransactionLifetime, TransactionSignature,
    };

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    const PENDING_WINDOW: Duration = Duration::from_millis(50);
    const SETTLE_WINDOW: Duration = Duration::from_millis(500);
    const FEE_PAYER: Address = [0xAA; 32];

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn signature(fill: u8) -> TransactionSignature {
        TransactionSignature([fill; 64])
    }

    /// A fee-payer-signed transaction with a blockhash lifetime.
    fn blockhash_transaction(last_valid_block_height: BlockHeight) -> SignedTransaction {
        let mut signatures = HashMap::new();
        signatures.insert(FEE_PAYER, signature(1));
        SignedTransaction {
            fee_payer: FEE_PAYER,
            signatures,
            lifetime: TransactionLifetime::Blockhash {
                blockhash: [0x0B; 32],
                last_valid_block_height,
            },
        }
    }

    /// A fee-payer-signed transaction with a durable-nonce lifetime.
    fn nonce_transaction(nonce_account: Address, nonce: Nonce) -> SignedTransaction {
        let mut signatures = HashMap::new();
        signatures.insert(FEE_PAYER, signature(2));
        SignedTransaction {
            fee_payer: FEE_PAYER,
            signatures,
            lifetime: TransactionLifetime::DurableNonce {
                nonce_account,
                nonce,
            },
        }
    }

    fn status_at(commitment: Commitment) -> SignatureStatus {
        SignatureStatus {
            slot: 42,
            confirmations: Some(4),
            confirmation_status: Some(commitment),
            err: None,
        }
    }

    fn epoch_info_at(block_height: BlockHeight) -> EpochInfo {
        EpochInfo {
            absolute_slot: block_height + 30,
            block_height,
            epoch: 3,
            slot_index: 11,
            slots_in_epoch: 8_192,
            transaction_count: None,
        }
    }

    fn engine(
        queries: &Arc<MockRpcQueries>,
        subscriptions: &Arc<MockRpcSubscriptions>,
    ) -> ConfirmationService<MockRpcQueries, MockRpcSubscriptions> {
        ConfirmationService::new(
            ConfirmationConfig::for_testing(),
            queries.clone(),
            subscriptions.clone(),
        )
    }

    fn signature_status_queries(queries: &MockRpcQueries) -> usize {
        queries
            .recorded_calls()
            .iter()
            .filter(|call| matches!(call, RecordedQuery::SignatureStatuses { .. }))
            .count()
    }

    fn epoch_info_queries(queries: &MockRpcQueries) -> usize {
        queries
            .recorded_calls()
            .iter()
            .filter(|call| matches!(call, RecordedQuery::EpochInfo { .. }))
            .count()
    }

    // =============================================================================
    // PUSH AND PULL SUCCESS PATHS
    // =============================================================================

    /// A transaction unknown at subscription time settles through the
    /// push path when the notification arrives.
    #[tokio::test]
    async fn test_push_path_settles_after_notification() {
        init_tracing();
        let queries = Arc::new(MockRpcQueries::new());
        let subscriptions = Arc::new(MockRpcSubscriptions::new());
        queries.push_signature_statuses(Ok(vec![None]));
        let engine: Arc<dyn ConfirmationApi> = Arc::new(engine(&queries, &subscriptions));
        let scope = CancellationScope::new();
        let transaction = blockhash_transaction(1_000);

        let mut confirm =
            Box::pin(engine.confirm_transaction(&transaction, Commitment::Confirmed, &scope));

        // Nothing settles until the cluster speaks.
        assert!(timeout(PENDING_WINDOW, &mut confirm).await.is_err());

        subscriptions.push_signature_notification(SignatureNotification { err: None });

        let outcome = timeout(SETTLE_WINDOW, &mut confirm)
            .await
            .expect("notification should settle the confirmation");
        assert_eq!(outcome, Ok(()));
    }

    /// A transaction already at the target commitment settles through the
    /// one-shot pull without any notification.
    #[tokio::test]
    async fn test_pull_path_settles_without_notification() {
        init_tracing();
        let queries = Arc::new(MockRpcQueries::new());
        let subscriptions = Arc::new(MockRpcSubscriptions::new());
        queries.push_signature_statuses(Ok(vec![Some(status_at(Commitment::Finalized))]));
        let engine = engine(&queries, &subscriptions);
        let scope = CancellationScope::new();

        let outcome = timeout(
            SETTLE_WINDOW,
            engine.confirm_transaction(&blockhash_transaction(1_000), Commitment::Finalized, &scope),
        )
        .await
        .expect("pull should settle the confirmation");

        assert_eq!(outcome, Ok(()));
        assert_eq!(signature_status_queries(&queries), 1);
    }

    /// A status above the target satisfies it: confirmed is enough when
    /// the caller only asked for processed.
    #[tokio::test]
    async fn test_pull_path_accepts_commitment_above_target() {
        let queries = Arc::new(MockRpcQueries::new());
        let subscriptions = Arc::new(MockRpcSubscriptions::new());
        queries.push_signature_statuses(Ok(vec![Some(status_at(Commitment::Confirmed))]));
        let engine = engine(&queries, &subscriptions);
        let scope = CancellationScope::new();

        let outcome = timeout(
            SETTLE_WINDOW,
            engine.confirm_transaction(
                &blockhash_transaction(1_000),
                Commitment::Processed,
                &scope,
            ),
        )
        .await
        .expect("a higher commitment should satisfy the target");

        assert_eq!(outcome, Ok(()));
    }

    /// No status pull may be issued before the subscription is
    /// acknowledged; the pull happens only after the gate releases.
    #[tokio::test]
    async fn test_no_pull_before_subscription_acknowledged() {
        let queries = Arc::new(MockRpcQueries::new());
        let subscriptions = Arc::new(MockRpcSubscriptions::new());
        queries.push_signature_statuses(Ok(vec![None]));
        let gate = subscriptions.gate_establishment();
        let engine = engine(&queries, &subscriptions);
        let scope = CancellationScope::new();
        let transaction = blockhash_transaction(1_000);

        let mut confirm =
            Box::pin(engine.confirm_transaction(&transaction, Commitment::Confirmed, &scope));

        assert!(timeout(PENDING_WINDOW, &mut confirm).await.is_err());
        assert_eq!(subscriptions.subscribe_count(), 1);
        assert_eq!(
            signature_status_queries(&queries),
            0,
            "no pull may race ahead of the subscription handshake"
        );

        gate.notify_one();
        assert!(timeout(PENDING_WINDOW, &mut confirm).await.is_err());
        assert_eq!(signature_status_queries(&queries), 1);

        subscriptions.push_signature_notification(SignatureNotification { err: None });
        let outcome = timeout(SETTLE_WINDOW, &mut confirm)
            .await
            .expect("notification should settle the confirmation");
        assert_eq!(outcome, Ok(()));
    }

    // =============================================================================
    // LIFETIME EXPIRY PATHS
    // =============================================================================

    /// The blockheight watcher polls until the reported height exceeds
    /// the last valid one, then the confirmation fails as expired.
    #[tokio::test]
    async fn test_blockhash_lifetime_expires_after_polling() {
        let queries = Arc::new(MockRpcQueries::new());
        let subscriptions = Arc::new(MockRpcSubscriptions::new());
        queries.push_signature_statuses(Ok(vec![None]));
        queries.push_epoch_info(Ok(epoch_info_at(99)));
        queries.push_epoch_info(Ok(epoch_info_at(100)));
        queries.push_epoch_info(Ok(epoch_info_at(101)));
        let engine = engine(&queries, &subscriptions);
        let scope = CancellationScope::new();

        let outcome = timeout(
            SETTLE_WINDOW,
            engine.confirm_transaction(&blockhash_transaction(100), Commitment::Confirmed, &scope),
        )
        .await
        .expect("exceedance should settle the confirmation");

        assert_eq!(
            outcome,
            Err(ConfirmationError::LifetimeExpired {
                kind: LifetimeKind::Blockhash
            })
        );
        // 99 and 100 are not past the window; 101 is.
        assert_eq!(epoch_info_queries(&queries), 3);
    }

    /// A pushed nonce value equal to the expected one keeps the
    /// confirmation open; an advanced one invalidates the lifetime.
    #[tokio::test]
    async fn test_nonce_lifetime_expires_when_nonce_advances() {
        let queries = Arc::new(MockRpcQueries::new());
        let subscriptions = Arc::new(MockRpcSubscriptions::new());
        queries.push_signature_statuses(Ok(vec![None]));
        queries.push_nonce_value(Ok([0x22; 32]));
        let engine = engine(&queries, &subscriptions);
        let scope = CancellationScope::new();
        let transaction = nonce_transaction([0x11; 32], [0x22; 32]);

        let mut confirm =
            Box::pin(engine.confirm_transaction(&transaction, Commitment::Confirmed, &scope));

        assert!(timeout(PENDING_WINDOW, &mut confirm).await.is_err());

        // Same value as signed against: still valid.
        subscriptions.push_nonce_update([0x22; 32]);
        assert!(timeout(PENDING_WINDOW, &mut confirm).await.is_err());

        subscriptions.push_nonce_update([0x33; 32]);
        let outcome = timeout(SETTLE_WINDOW, &mut confirm)
            .await
            .expect("an advanced nonce should settle the confirmation");
        assert_eq!(
            outcome,
            Err(ConfirmationError::LifetimeExpired {
                kind: LifetimeKind::DurableNonce
            })
        );
    }

    // =============================================================================
    // SERVICE-LEVEL BEHAVIOR
    // =============================================================================

    /// The convenience entry point confirms at the configured default
    /// commitment.
    #[tokio::test]
    async fn test_default_commitment_flow() {
        let queries = Arc::new(MockRpcQueries::new());
        let subscriptions = Arc::new(MockRpcSubscriptions::new());
        queries.push_signature_statuses(Ok(vec![Some(status_at(Commitment::Confirmed))]));
        let engine = engine(&queries, &subscriptions);
        let scope = CancellationScope::new();

        timeout(
            SETTLE_WINDOW,
            engine.confirm_with_default_commitment(&blockhash_transaction(1_000), &scope),
        )
        .await
        .expect("pull should settle the confirmation")
        .expect("confirmed status satisfies the default target");

        let subscribes = subscriptions.recorded_subscribes();
        assert!(matches!(
            subscribes[0],
            RecordedSubscribe::SignatureNotifications {
                commitment: Commitment::Confirmed,
                ..
            }
        ));
    }

    /// Two in-flight confirmations settle independently: one expires
    /// while the other waits out its notification.
    #[tokio::test]
    async fn test_concurrent_confirmations_settle_independently() {
        let queries = Arc::new(MockRpcQueries::new());
        let subscriptions = Arc::new(MockRpcSubscriptions::new());
        queries.push_signature_statuses(Ok(vec![None]));
        queries.push_signature_statuses(Ok(vec![None]));
        queries.push_nonce_value(Ok([0x22; 32]));
        queries.push_epoch_info(Ok(epoch_info_at(101)));
        let engine = engine(&queries, &subscriptions);
        let scope = CancellationScope::new();

        let durable = nonce_transaction([0x11; 32], [0x22; 32]);
        let expiring = blockhash_transaction(100);

        let mut both = Box::pin(futures::future::join(
            engine.confirm_transaction(&durable, Commitment::Confirmed, &scope),
            engine.confirm_transaction(&expiring, Commitment::Confirmed, &scope),
        ));

        // The blockhash confirmation expires on its own; the durable one
        // still waits.
        assert!(timeout(PENDING_WINDOW, &mut both).await.is_err());

        subscriptions.push_signature_notification(SignatureNotification { err: None });

        let (durable_outcome, expiring_outcome) = timeout(SETTLE_WINDOW, &mut both)
            .await
            .expect("both confirmations should settle");
        assert_eq!(durable_outcome, Ok(()));
        assert_eq!(
            expiring_outcome,
            Err(ConfirmationError::LifetimeExpired {
                kind: LifetimeKind::Blockhash
            })
        );
    }

    /// Settlement tears the confirmation's subscriptions down and leaves
    /// the caller's scope untouched.
    #[tokio::test]
    async fn test_settlement_releases_resources() {
        let queries = Arc::new(MockRpcQueries::new());
        let subscriptions = Arc::new(MockRpcSubscriptions::new());
        queries.push_signature_statuses(Ok(vec![Some(status_at(Commitment::Finalized))]));
        let engine = engine(&queries, &subscriptions);
        let scope = CancellationScope::new();

        let outcome = engine
            .confirm_transaction(&blockhash_transaction(1_000), Commitment::Finalized, &scope)
            .await;
        assert_eq!(outcome, Ok(()));

        assert!(
            !scope.is_cancelled(),
            "settlement must not cancel the caller's scope"
        );
        assert!(
            !subscriptions.push_signature_notification(SignatureNotification { err: None }),
            "the settled confirmation's stream should be gone"
        );
    }
}
