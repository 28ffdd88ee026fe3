//! # Domain Layer
//!
//! The engine's pure building blocks: the cancellation-scope tree and the
//! cancellable notification stream. Neither knows anything about RPC.

pub mod scope;
pub mod stream;

pub use scope::CancellationScope;
pub use stream::{notification_channel, NotificationSender, NotificationStream};
