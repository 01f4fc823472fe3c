// ============================================
// File: crates/veilink-core/src/crypto/mod.rs
// ============================================
//! # Cryptography Module
//!
//! ## Creation Reason
//! Centralizes the cryptographic operations of the codec, using
//! audited RustCrypto implementations throughout.
//!
//! ## Main Functionality
//! - [`keys`]: key types (X25519 session pairs, cluster key, derived
//!   cipher key)
//! - [`kdf`]: HKDF-SHA256 cipher-key derivation with public-key binding
//! - [`cipher`]: authenticated encryption of 128-bit field words
//!
//! ## ⚠️ Important Note for Next Developer
//! - NEVER roll your own crypto; everything here delegates to
//!   RustCrypto crates
//! - A session secret is consumed by key agreement and can never be
//!   reused; the type system enforces this
//!
//! ## Last Modified
//! v0.1.0 - Initial crypto implementation

pub mod cipher;
pub mod kdf;
pub mod keys;

// Re-export primary types at module level
pub use cipher::{AuthTag, CiphertextVector, CiphertextWord, LinkNonce};
pub use keys::{CipherKey, ClusterPublicKey, SessionKeyPair, SessionPublicKey, SharedSecret};

// ============================================
// Constants
// ============================================

/// Size of an X25519 public key in bytes.
pub const X25519_PUBLIC_KEY_SIZE: usize = 32;

/// Size of the derived cipher key in bytes.
pub const CIPHER_KEY_SIZE: usize = 32;

/// Size of the per-link encryption nonce in bytes.
pub const LINK_NONCE_SIZE: usize = 16;

/// Size of the extended XChaCha20 nonce in bytes.
pub const XCHACHA_NONCE_SIZE: usize = 24;

/// Size of the Poly1305 authentication tag in bytes.
pub const POLY1305_TAG_SIZE: usize = 16;

/// Number of ciphertext words in one encoded link (two addresses,
/// two 128-bit words each).
pub const CIPHERTEXT_WORDS: usize = 4;

/// HKDF salt for cipher-key derivation.
pub const HKDF_SALT: &[u8] = b"veilink-v1";

/// HKDF info prefix for cipher-key derivation.
pub const HKDF_INFO_PREFIX: &[u8] = b"veilink-cipher-key";
