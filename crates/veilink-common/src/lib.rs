// ============================================
// File: crates/veilink-common/src/lib.rs
// ============================================
//! # Veilink Common - Shared Types & Utilities
//!
//! ## Creation Reason
//! Provides the fundamental types shared by every Veilink crate:
//! wallet addresses, request identifiers, base error types, and
//! serialization helpers.
//!
//! ## Main Functionality
//! - [`types`]: `WalletAddress` and `RequestId`
//! - [`error`]: `CommonError` and the common `Result` alias
//! - [`b64`]: base64 serde helpers for fixed-size byte arrays
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            veilink-client               │
//! │                  │                      │
//! │                  ▼                      │
//! │            veilink-core                 │
//! │                  │                      │
//! │                  ▼                      │
//! │            veilink-common               │
//! │            You are here                 │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Last Modified
//! v0.1.0 - Initial implementation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod b64;
pub mod error;
pub mod types;

pub use error::{CommonError, Result};
pub use types::{RequestId, WalletAddress};
