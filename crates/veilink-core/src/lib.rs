// ============================================
// File: crates/veilink-core/src/lib.rs
// ============================================
//! # Veilink Core - Confidential Field Codec
//!
//! ## Creation Reason
//! Implements the cryptographic core of Veilink: converting a pair of
//! 32-byte wallet addresses into a transport-safe encrypted form for a
//! remote confidential-computation cluster, and converting the result
//! event back into the original addresses.
//!
//! ## Main Functionality
//!
//! ### Field Module ([`field`])
//! - Big-endian split of one address into two 128-bit words
//! - Exact inverse join, the invariant the whole codec rests on
//!
//! ### Crypto Module ([`crypto`])
//! - Key types (`SessionKeyPair`, `ClusterPublicKey`, `SharedSecret`)
//! - Key derivation (HKDF-SHA256 with public-key binding)
//! - Authenticated encryption of field words (XChaCha20-Poly1305)
//!
//! ### Codec Module ([`codec`])
//! - `encode_link`: addresses -> ciphertext vector + session context
//! - `decode_link`: result event -> original addresses
//!
//! ## Cryptographic Design
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      Encode                                  │
//! │                                                              │
//! │  fresh X25519 session key ──┐                                │
//! │  cluster public key ────────┴─► DH ─► HKDF ─► cipher key     │
//! │                                                              │
//! │  addrA ─► (lowA, highA) ┐                                    │
//! │  addrB ─► (lowB, highB) ┴─► XChaCha20-Poly1305 ─► 4 words    │
//! │                              (fresh 16-byte nonce)   + tag   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Security Guarantees
//! - **Confidentiality**: XChaCha20 stream encryption
//! - **Integrity**: Poly1305 tag over the whole word vector
//! - **Forward Secrecy**: fresh X25519 session key per encode
//! - **No Nonce Reuse**: fresh random 16-byte nonce per encode
//!
//! ## ⚠️ Important Note for Next Developer
//! - ALL cryptographic code uses audited RustCrypto implementations
//! - NEVER implement custom crypto primitives
//! - ALL secret material MUST implement Zeroize
//! - Word order (lowA, highA, lowB, highB) is part of the protocol;
//!   reordering silently corrupts wallet linkage
//!
//! ## Last Modified
//! v0.1.0 - Initial implementation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod codec;
pub mod crypto;
pub mod error;
pub mod field;

// Re-export commonly used items
pub use codec::{decode_link, encode_link, EncodedLink};
pub use crypto::cipher::{AuthTag, CiphertextVector, CiphertextWord, LinkNonce};
pub use crypto::keys::{CipherKey, ClusterPublicKey, SessionKeyPair, SessionPublicKey, SharedSecret};
pub use error::{CoreError, Result};
pub use field::FieldPair;
