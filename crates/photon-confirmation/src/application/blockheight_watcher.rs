//! # Blockheight Exceedance Watcher
//!
//! Expiry watcher for blockhash-lifetime transactions. A transaction
//! built against a recent blockhash can only land while the network's
//! block height is at or below its `last_valid_block_height`; once the
//! height passes that bound the window is closed for good, because block
//! heights only grow.

use crate::domain::CancellationScope;
use crate::ports::outbound::RpcQueryGateway;
use shared_types::{BlockHeight, Commitment, TransportResult};
use std::future::pending;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Polls epoch info until a blockhash lifetime's window closes.
pub struct BlockheightExceedanceWatcher<Q> {
    queries: Arc<Q>,
    poll_interval: Duration,
}

impl<Q> BlockheightExceedanceWatcher<Q>
where
    Q: RpcQueryGateway,
{
    /// Create a watcher polling at `poll_interval`.
    pub fn new(queries: Arc<Q>, poll_interval: Duration) -> Self {
        Self {
            queries,
            poll_interval,
        }
    }

    /// Watch for the network's block height passing
    /// `last_valid_block_height`.
    ///
    /// Settles `Ok(())` once the reported height exceeds the bound, at
    /// which point the transaction can no longer land, and `Err` on a
    /// transport failure.
    /// Otherwise keeps polling; cancelling `scope` stops the polling
    /// without settling.
    pub async fn watch(
        &self,
        last_valid_block_height: BlockHeight,
        commitment: Commitment,
        scope: &CancellationScope,
    ) -> TransportResult<()> {
        let poll = async {
            loop {
                let info = self.queries.get_epoch_info(commitment, scope).await?;
                if info.block_height > last_valid_block_height {
                    debug!(
                        block_height = info.block_height,
                        last_valid_block_height, "blockhash lifetime window closed"
                    );
                    return Ok(());
                }
                tokio::time::sleep(self.poll_interval).await;
            }
        };

        tokio::select! {
            biased;
            () = scope.cancelled() => pending().await,
            outcome = poll => outcome,
        }
    }
}
