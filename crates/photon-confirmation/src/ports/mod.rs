//! # Ports Layer
//!
//! Contracts at the crate boundary: the inbound API callers use and the
//! outbound gateway traits the engine's injected RPC capabilities
//! implement.

pub mod inbound;
pub mod outbound;

pub use inbound::ConfirmationApi;
pub use outbound::{RpcQueryGateway, RpcSubscriptionsGateway};
