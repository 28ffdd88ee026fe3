//! # Core Domain Entities
//!
//! Defines the client-side view of transactions and the typed DTOs of the
//! RPC surface the confirmation engine consumes.
//!
//! ## Clusters
//!
//! - **Handles**: `Hash`, `Address`, `TransactionSignature`
//! - **Transactions**: `SignedTransaction`, `TransactionLifetime`
//! - **RPC DTOs**: `SignatureStatus`, `SignatureNotification`, `EpochInfo`

use crate::commitment::Commitment;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use std::collections::HashMap;
use std::fmt;

// =============================================================================
// CLUSTER A: HANDLES
// =============================================================================

/// A 32-byte hash.
pub type Hash = [u8; 32];

/// A 32-byte Ed25519 public key, used directly as an account address.
pub type Address = [u8; 32];

/// A recent block's hash, doubling as a transaction lifetime token.
pub type Blockhash = Hash;

/// A durable nonce value. The chain stores a blockhash in the nonce
/// account, so the value shares the `Hash` layout.
pub type Nonce = Hash;

/// A slot number.
pub type Slot = u64;

/// A block height. Unlike slots, heights count only blocks that were
/// actually produced, so the sequence has no holes.
pub type BlockHeight = u64;

/// An epoch number.
pub type Epoch = u64;

/// The fee payer's 64-byte Ed25519 signature over a transaction.
///
/// Once a transaction is signed, this is its unique tracking handle: every
/// confirmation query is keyed by it. No code here interprets the bytes.
#[serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionSignature(#[serde_as(as = "Bytes")] pub [u8; 64]);

impl fmt::Display for TransactionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

// =============================================================================
// CLUSTER B: TRANSACTIONS
// =============================================================================

/// The validity window of a signed transaction.
///
/// Exactly one variant applies per transaction; the variant decides which
/// expiry watcher the confirmation engine runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionLifetime {
    /// Valid until the network's block height passes
    /// `last_valid_block_height`.
    Blockhash {
        /// The recent blockhash the transaction was built against.
        blockhash: Blockhash,
        /// The last block height at which the transaction can still land.
        last_valid_block_height: BlockHeight,
    },
    /// Valid for as long as the on-chain nonce account still holds the
    /// value captured at signing time.
    DurableNonce {
        /// The nonce account consumed by the transaction.
        nonce_account: Address,
        /// The nonce value captured when the transaction was signed.
        nonce: Nonce,
    },
}

impl TransactionLifetime {
    /// The kind tag used when reporting lifetime expiry.
    #[must_use]
    pub fn kind(&self) -> LifetimeKind {
        match self {
            TransactionLifetime::Blockhash { .. } => LifetimeKind::Blockhash,
            TransactionLifetime::DurableNonce { .. } => LifetimeKind::DurableNonce,
        }
    }
}

/// Which lifetime mechanism a transaction used, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifetimeKind {
    /// Blockhash-bounded validity window.
    Blockhash,
    /// Durable-nonce-bounded validity window.
    DurableNonce,
}

impl fmt::Display for LifetimeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifetimeKind::Blockhash => f.write_str("blockhash"),
            LifetimeKind::DurableNonce => f.write_str("durable nonce"),
        }
    }
}

/// A fully signed transaction as the client sees it.
///
/// Trackability invariant: the transaction can be confirmed only if
/// `signatures` carries an entry keyed by `fee_payer`; that entry is the
/// canonical [`TransactionSignature`] used for every confirmation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    /// The account that pays the transaction fee.
    pub fee_payer: Address,
    /// One signature per signer, keyed by signer address.
    pub signatures: HashMap<Address, TransactionSignature>,
    /// The transaction's validity window.
    pub lifetime: TransactionLifetime,
}

impl SignedTransaction {
    /// The canonical tracking signature: the fee payer's entry in the
    /// signature map, or `None` if the fee payer has not signed.
    #[must_use]
    pub fn tracking_signature(&self) -> Option<&TransactionSignature> {
        self.signatures.get(&self.fee_payer)
    }
}

// =============================================================================
// CLUSTER C: RPC DTOS
// =============================================================================

/// The failure payload the cluster reports for a transaction that executed
/// and failed. Carried verbatim; the client does not interpret it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionError(pub String);

impl fmt::Display for TransactionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One row of a signature-status query response.
///
/// A `None` row (at the response level) means the cluster has not seen the
/// signature at all; this struct only exists for signatures the cluster
/// knows about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureStatus {
    /// The slot the transaction was processed in.
    pub slot: Slot,
    /// Cluster confirmations counted so far, `None` once rooted.
    pub confirmations: Option<u64>,
    /// The deepest commitment level the transaction has reached.
    pub confirmation_status: Option<Commitment>,
    /// The execution error, if the transaction failed.
    pub err: Option<TransactionError>,
}

impl SignatureStatus {
    /// Whether this status satisfies a caller waiting for `target`.
    #[must_use]
    pub fn satisfies(&self, target: Commitment) -> bool {
        self.confirmation_status
            .is_some_and(|status| status.satisfies(target))
    }
}

/// One push notification about a watched signature reaching the
/// subscription's commitment level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureNotification {
    /// The execution error, if the transaction failed.
    pub err: Option<TransactionError>,
}

/// Epoch-level chain progress, including the current block height.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpochInfo {
    /// The current slot.
    pub absolute_slot: Slot,
    /// The current block height.
    pub block_height: BlockHeight,
    /// The current epoch.
    pub epoch: Epoch,
    /// The current slot relative to the start of the epoch.
    pub slot_index: u64,
    /// The number of slots in this epoch.
    pub slots_in_epoch: u64,
    /// Total transaction count since genesis, when the node tracks it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_count: Option<u64>,
}
