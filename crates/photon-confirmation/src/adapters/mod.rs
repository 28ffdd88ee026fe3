//! # Adapters Layer
//!
//! Concrete implementations of the outbound ports. Real transports live
//! in the RPC crates; this crate ships only the scriptable in-memory
//! gateways the test suites drive.

pub mod mock_rpc;

pub use mock_rpc::{MockRpcQueries, MockRpcSubscriptions, RecordedQuery, RecordedSubscribe};
