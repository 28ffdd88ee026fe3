//! # Shared Types Crate
//!
//! This crate contains the client-wide data model for Photon-Client:
//! commitment levels, transaction views, lifetime constraints, and the
//! typed DTOs of the RPC surface the client consumes.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: every type that crosses a crate boundary
//!   is defined here, once.
//! - **Opaque handles**: a [`TransactionSignature`] is the sole handle used
//!   to track a submitted transaction; no crate inspects its bytes.
//! - **Wire fidelity**: RPC-shaped DTOs keep the server's camelCase field
//!   names through serde renames rather than leaking them into Rust names.

pub mod commitment;
pub mod entities;
pub mod errors;

pub use commitment::Commitment;
pub use entities::*;
pub use errors::*;
