//! # Confirmation Configuration
//!
//! Configuration for the confirmation engine.

use serde::{Deserialize, Serialize};
use shared_types::Commitment;
use std::time::Duration;

/// Confirmation engine configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConfirmationConfig {
    /// How often the blockheight-exceedance watcher polls epoch info,
    /// in milliseconds.
    pub block_height_poll_interval_ms: u64,

    /// Commitment level applied when a caller does not pick one.
    pub default_commitment: Commitment,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            block_height_poll_interval_ms: 1_000,
            default_commitment: Commitment::default(),
        }
    }
}

impl ConfirmationConfig {
    /// Create a config for testing (tight timings).
    pub fn for_testing() -> Self {
        Self {
            block_height_poll_interval_ms: 5,
            default_commitment: Commitment::default(),
        }
    }

    /// The blockheight poll cadence as a [`Duration`].
    #[must_use]
    pub fn block_height_poll_interval(&self) -> Duration {
        Duration::from_millis(self.block_height_poll_interval_ms)
    }
}
