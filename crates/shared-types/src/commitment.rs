//! # Commitment Levels
//!
//! Defines the finality levels a client can require before treating a
//! transaction as landed, and the total order used to compare them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How final a transaction's containing block must be before the client
/// accepts it as confirmed.
///
/// The levels form a total order: `Processed < Confirmed < Finalized`.
/// A status observed at one level satisfies any target at or below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    /// The block containing the transaction was processed by the queried
    /// node. The block may still be skipped by the cluster.
    Processed,
    /// A supermajority of stake voted on the block. Rollback is unlikely
    /// but still possible.
    Confirmed,
    /// The block was rooted by the cluster and cannot be rolled back.
    Finalized,
}

impl Commitment {
    /// Whether a status observed at `self` satisfies a caller asking for
    /// `target`.
    ///
    /// Deeper levels imply shallower ones: a `Finalized` observation
    /// satisfies a `Confirmed` target, never the reverse.
    #[must_use]
    pub fn satisfies(self, target: Commitment) -> bool {
        self >= target
    }

    /// The wire name of this level, as the RPC surface spells it.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Commitment::Processed => "processed",
            Commitment::Confirmed => "confirmed",
            Commitment::Finalized => "finalized",
        }
    }
}

impl Default for Commitment {
    /// `Confirmed` balances latency against rollback risk and is the
    /// default everywhere the caller does not say otherwise.
    fn default() -> Self {
        Commitment::Confirmed
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
