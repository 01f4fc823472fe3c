// ============================================
// File: crates/veilink-core/src/crypto/keys.rs
// ============================================
//! # Cryptographic Key Types
//!
//! ## Creation Reason
//! Defines the key types used by the codec with proper security
//! properties (Zeroize on drop, constant-time comparison, single-use
//! session secrets).
//!
//! ## Key Lifecycle
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │  ClusterPublicKey (long-lived, remote)                     │
//! │  ├─ Published by the computation cluster                   │
//! │  └─ Fetched by the host application, handed to the codec   │
//! │                                                            │
//! │  SessionKeyPair (per-encode)                               │
//! │  ├─ Generated fresh for every encode from the OS CSPRNG    │
//! │  ├─ Consumed by key agreement, never reusable              │
//! │  └─ Only the public half crosses the boundary              │
//! │                                                            │
//! │  SharedSecret -> CipherKey (per-encode)                    │
//! │  ├─ DH output, used only as HKDF input                     │
//! │  └─ CipherKey retained until the result event is consumed  │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - Secret material MUST stay out of Debug/Display/logs
//! - A predictable session secret collapses key-agreement security
//!   to that of a static key; only `OsRng` is acceptable here
//!
//! ## Last Modified
//! v0.1.0 - Initial key type definitions

use std::fmt;

use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use x25519_dalek::{EphemeralSecret, PublicKey as X25519PublicKey};
use zeroize::{Zeroize, ZeroizeOnDrop};

use veilink_common::b64;
use veilink_common::error::CommonError;

use super::{CIPHER_KEY_SIZE, X25519_PUBLIC_KEY_SIZE};
use crate::error::{CoreError, Result};

// ============================================
// ClusterPublicKey
// ============================================

/// The computation cluster's long-lived X25519 public key.
///
/// Provided by an external network-metadata lookup; the codec treats
/// it as opaque 32 bytes until key agreement.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterPublicKey(#[serde(with = "veilink_common::b64")] [u8; X25519_PUBLIC_KEY_SIZE]);

impl ClusterPublicKey {
    /// Creates a cluster key from a fixed 32-byte array.
    #[must_use]
    pub const fn from_array(bytes: [u8; X25519_PUBLIC_KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Creates a cluster key from a byte slice.
    ///
    /// # Errors
    /// Returns `InvalidLength` if the slice is not exactly 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != X25519_PUBLIC_KEY_SIZE {
            return Err(
                CommonError::invalid_length(X25519_PUBLIC_KEY_SIZE, bytes.len()).into(),
            );
        }
        let mut key = [0u8; X25519_PUBLIC_KEY_SIZE];
        key.copy_from_slice(bytes);
        Ok(Self(key))
    }

    /// Returns the raw key bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; X25519_PUBLIC_KEY_SIZE] {
        &self.0
    }
}

impl fmt::Debug for ClusterPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ClusterPublicKey({:02x}{:02x}{:02x}{:02x}...)",
            self.0[0], self.0[1], self.0[2], self.0[3]
        )
    }
}

impl fmt::Display for ClusterPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", b64::encode(&self.0))
    }
}

// ============================================
// SessionPublicKey
// ============================================

/// The public half of a session key pair.
///
/// Accompanies the ciphertext so the cluster can rederive the shared
/// secret. Safe to transmit and log.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionPublicKey(#[serde(with = "veilink_common::b64")] [u8; X25519_PUBLIC_KEY_SIZE]);

impl SessionPublicKey {
    /// Creates a session public key from a fixed 32-byte array.
    #[must_use]
    pub const fn from_array(bytes: [u8; X25519_PUBLIC_KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Returns the raw key bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; X25519_PUBLIC_KEY_SIZE] {
        &self.0
    }
}

impl fmt::Debug for SessionPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SessionPublicKey({:02x}{:02x}{:02x}{:02x}...)",
            self.0[0], self.0[1], self.0[2], self.0[3]
        )
    }
}

impl fmt::Display for SessionPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", b64::encode(&self.0))
    }
}

// ============================================
// SessionKeyPair (X25519)
// ============================================

/// Ephemeral X25519 key pair generated fresh for one encode.
///
/// # Single Use
/// `agree` consumes the pair, so the secret half cannot outlive the
/// key agreement it was created for. Forward secrecy follows: once
/// the pair is gone, only the derived cipher key remains.
///
/// # Example
/// ```
/// use veilink_core::crypto::keys::{ClusterPublicKey, SessionKeyPair};
///
/// # fn main() -> veilink_core::Result<()> {
/// let remote = SessionKeyPair::generate();
/// let cluster = ClusterPublicKey::from_array(*remote.public_key().as_bytes());
///
/// let session = SessionKeyPair::generate();
/// let shared = session.agree(&cluster)?;
/// # Ok(())
/// # }
/// ```
pub struct SessionKeyPair {
    secret: EphemeralSecret,
    public: X25519PublicKey,
}

impl SessionKeyPair {
    /// Generates a new random session key pair.
    ///
    /// Uses the operating system's secure random number generator.
    #[must_use]
    pub fn generate() -> Self {
        let secret = EphemeralSecret::random_from_rng(OsRng);
        let public = X25519PublicKey::from(&secret);
        Self { secret, public }
    }

    /// Returns the public half of the pair.
    #[must_use]
    pub fn public_key(&self) -> SessionPublicKey {
        SessionPublicKey(self.public.to_bytes())
    }

    /// Performs X25519 key agreement with the cluster's public key.
    ///
    /// # Consumes Self
    /// The secret half is used up by this call; a fresh pair must be
    /// generated for the next encode.
    ///
    /// # Errors
    /// Returns `KeyAgreement` if the cluster key is a low-order point
    /// producing a non-contributory (all-zero) shared secret.
    pub fn agree(self, cluster_key: &ClusterPublicKey) -> Result<SharedSecret> {
        let peer = X25519PublicKey::from(*cluster_key.as_bytes());
        let shared = self.secret.diffie_hellman(&peer);

        if !shared.was_contributory() {
            return Err(CoreError::key_agreement(
                "cluster key is a low-order point",
            ));
        }

        Ok(SharedSecret(*shared.as_bytes()))
    }
}

impl fmt::Debug for SessionKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print secret material
        f.debug_struct("SessionKeyPair")
            .field("public", &self.public_key())
            .finish_non_exhaustive()
    }
}

// ============================================
// SharedSecret
// ============================================

/// The raw X25519 Diffie-Hellman output.
///
/// Used only as key-derivation input; never stored, transmitted, or
/// logged. Zeroed on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SharedSecret([u8; 32]);

impl SharedSecret {
    /// Creates a shared secret from raw bytes.
    ///
    /// Exists for the cluster-side derivation path, where the secret
    /// comes out of a DH against a static key rather than `agree`.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the raw secret bytes.
    ///
    /// # Security Warning
    /// Handle with care; feed this only into key derivation.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SharedSecret([REDACTED])")
    }
}

impl PartialEq for SharedSecret {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl Eq for SharedSecret {}

// ============================================
// CipherKey
// ============================================

/// Symmetric key derived from a shared secret via HKDF.
///
/// This is the per-request context a caller retains between encode
/// and the later decode of the result event. Zeroed on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct CipherKey([u8; CIPHER_KEY_SIZE]);

impl CipherKey {
    /// Creates a cipher key from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; CIPHER_KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Returns the raw key bytes.
    ///
    /// # Security Warning
    /// Do not log or persist the key material in unprotected storage.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; CIPHER_KEY_SIZE] {
        &self.0
    }
}

impl fmt::Debug for CipherKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CipherKey([REDACTED])")
    }
}

impl PartialEq for CipherKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl Eq for CipherKey {}

// ============================================
// Tests
// ============================================
