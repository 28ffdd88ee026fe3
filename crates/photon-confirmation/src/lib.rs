//! # Photon Confirmation
//!
//! Transaction confirmation engine for Photon clients.
//!
//! ## Purpose
//!
//! Answer one question as early as possible without missing the answer:
//! has this signed transaction reached the caller's target commitment,
//! failed on chain, or become permanently unable to land? The engine
//! combines:
//! - A push/pull signature watcher that subscribes before it pulls, so no
//!   status update can fall between the two.
//! - Lifetime-expiry watchers for blockhash windows and durable nonces.
//! - A coordinator that races the signals under asymmetric trust and
//!   settles exactly once.
//!
//! Cancellation is hierarchical: every confirmation runs under a child of
//! the caller's [`CancellationScope`], and cancelling never settles an
//! outcome.
//!
//! ## Module Structure
//!
//! ```text
//! photon-confirmation/
//! ├── domain/          # CancellationScope, NotificationStream
//! ├── ports/           # ConfirmationApi (inbound) + RPC gateways (outbound)
//! ├── adapters/        # Scriptable mock gateways for tests
//! ├── application/     # Watchers + ConfirmationService coordinator
//! ├── config.rs        # ConfirmationConfig
//! └── error.rs         # ConfirmationError
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;

// Re-exports
pub use application::{
    BlockheightExceedanceWatcher, ConfirmationService, NonceInvalidationWatcher,
    SignatureConfirmationWatcher,
};
pub use config::ConfirmationConfig;
pub use domain::{notification_channel, CancellationScope, NotificationSender, NotificationStream};
pub use error::{ConfirmationError, ConfirmationResult};
pub use ports::{ConfirmationApi, RpcQueryGateway, RpcSubscriptionsGateway};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
