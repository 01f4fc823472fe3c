// ============================================
// File: crates/veilink-client/src/lib.rs
// ============================================
//! # Veilink Client - Request Correlation & Envelopes
//!
//! ## Creation Reason
//! The codec in `veilink-core` is pure and stateless, but encode and
//! decode happen on opposite sides of an asynchronous round trip to
//! the computation cluster. This crate owns what lives in between:
//! the pending-link store correlating request ids with retained
//! cipher keys, the serialized request/result envelopes, and the
//! `LinkService` the host application actually calls.
//!
//! ## Main Functionality
//! - [`pending`]: bounded, expiring store of in-flight link requests
//! - [`link`]: `LinkRequest`/`LinkResult` envelopes and `LinkService`
//! - [`config`]: client configuration with serde support
//!
//! ## Main Logical Flow
//! 1. `begin_link` encodes a pair of addresses, registers the cipher
//!    key under a fresh request id, returns the outbound envelope
//! 2. The host transport submits the envelope and later delivers the
//!    result event
//! 3. `complete_link` consumes the pending entry and decodes the
//!    original addresses
//!
//! ## Last Modified
//! v0.1.0 - Initial implementation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod link;
pub mod pending;

pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use link::{LinkRequest, LinkResult, LinkService};
pub use pending::{PendingLink, PendingLinks};
