//! # Application Module
//!
//! The watchers and the coordinator that races them.

pub mod blockheight_watcher;
pub mod coordinator;
pub mod nonce_watcher;
pub mod signature_watcher;

pub use blockheight_watcher::BlockheightExceedanceWatcher;
pub use coordinator::ConfirmationService;
pub use nonce_watcher::NonceInvalidationWatcher;
pub use signature_watcher::SignatureConfirmationWatcher;
