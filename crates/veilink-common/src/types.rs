// ============================================
// File: crates/veilink-common/src/types.rs
// ============================================
//! # Core Type Definitions
//!
//! ## Creation Reason
//! Centralizes the fundamental identifiers used throughout Veilink,
//! ensuring type safety and consistent representations.
//!
//! ## Main Functionality
//! - `WalletAddress`: 32-byte ledger account identifier
//! - `RequestId`: 64-bit tag for one confidential-computation request
//!
//! ## Main Logical Flow
//! 1. Addresses enter the library from the host application
//! 2. Request ids are generated when a link request is prepared
//! 3. Both are serialized into the outbound request envelope
//!
//! ## ⚠️ Important Note for Next Developer
//! - RequestId must come from a cryptographically secure random
//!   source - a predictable id lets an attacker correlate requests
//! - WalletAddress is immutable once constructed; keep it that way
//!
//! ## Last Modified
//! v0.1.0 - Initial type definitions

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::b64;
use crate::error::{CommonError, Result};

// ============================================
// Constants
// ============================================

/// Size of a wallet address in bytes.
pub const WALLET_ADDRESS_SIZE: usize = 32;

// ============================================
// WalletAddress
// ============================================

/// Fixed 32-byte identifier for an account on the host ledger.
///
/// # Properties
/// - Immutable once constructed
/// - No internal invariants beyond fixed length
/// - Human-readable serialization is base64; binary stays raw bytes
///
/// # Example
/// ```
/// use veilink_common::types::WalletAddress;
///
/// let addr = WalletAddress::from_array([0x11; 32]);
/// let restored = WalletAddress::from_bytes(addr.as_bytes()).unwrap();
/// assert_eq!(addr, restored);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletAddress(#[serde(with = "crate::b64")] [u8; WALLET_ADDRESS_SIZE]);

impl WalletAddress {
    /// Creates an address from a fixed 32-byte array.
    #[must_use]
    pub const fn from_array(bytes: [u8; WALLET_ADDRESS_SIZE]) -> Self {
        Self(bytes)
    }

    /// Creates an address from a byte slice.
    ///
    /// # Errors
    /// Returns `InvalidLength` if the slice is not exactly 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != WALLET_ADDRESS_SIZE {
            return Err(CommonError::invalid_length(WALLET_ADDRESS_SIZE, bytes.len()));
        }
        let mut addr = [0u8; WALLET_ADDRESS_SIZE];
        addr.copy_from_slice(bytes);
        Ok(Self(addr))
    }

    /// Returns the raw address bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; WALLET_ADDRESS_SIZE] {
        &self.0
    }

    /// Returns the raw address bytes (owned).
    #[must_use]
    pub const fn to_bytes(&self) -> [u8; WALLET_ADDRESS_SIZE] {
        self.0
    }
}

impl fmt::Debug for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Only show the first 4 bytes for privacy
        write!(
            f,
            "WalletAddress({:02x}{:02x}{:02x}{:02x}...)",
            self.0[0], self.0[1], self.0[2], self.0[3]
        )
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", b64::encode(&self.0))
    }
}

impl FromStr for WalletAddress {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self> {
        let bytes = b64::decode(s)?;
        Self::from_bytes(&bytes)
    }
}

impl AsRef<[u8]> for WalletAddress {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; WALLET_ADDRESS_SIZE]> for WalletAddress {
    fn from(bytes: [u8; WALLET_ADDRESS_SIZE]) -> Self {
        Self(bytes)
    }
}

// ============================================
// RequestId
// ============================================

/// 64-bit tag uniquely identifying one computation request.
///
/// Distinct from the 16-byte encryption nonce: this id correlates a
/// submitted request with its asynchronous result event. It carries
/// no structure beyond its width.
///
/// # Example
/// ```
/// use veilink_common::types::RequestId;
///
/// let id = RequestId::generate();
/// let same = RequestId::from_raw(id.value());
/// assert_eq!(id, same);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(u64);

impl RequestId {
    /// Generates a new random request id.
    ///
    /// Uses the thread-local CSPRNG seeded from the operating system.
    #[must_use]
    pub fn generate() -> Self {
        Self(rand::random::<u64>())
    }

    /// Creates a request id from a raw value.
    #[must_use]
    pub const fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw id value.
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl From<u64> for RequestId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<RequestId> for u64 {
    fn from(id: RequestId) -> Self {
        id.0
    }
}

// ============================================
// Tests
// ============================================
