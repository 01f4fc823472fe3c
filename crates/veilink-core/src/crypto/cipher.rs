// ============================================
// File: crates/veilink-core/src/crypto/cipher.rs
// ============================================
//! # Authenticated Field-Word Cipher
//!
//! ## Creation Reason
//! Encrypts the four 128-bit field words of one wallet-address pair
//! under a derived cipher key, and decrypts the four-word vector that
//! comes back in a computation-result event.
//!
//! ## Ciphertext Layout
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │ word 0 (16 bytes)  │ lowA   encrypted                │
//! │ word 1 (16 bytes)  │ highA  encrypted                │
//! │ word 2 (16 bytes)  │ lowB   encrypted                │
//! │ word 3 (16 bytes)  │ highB  encrypted                │
//! ├──────────────────────────────────────────────────────┤
//! │ tag    (16 bytes)  │ Poly1305 over the whole vector  │
//! └──────────────────────────────────────────────────────┘
//! ```
//! All five parts come out of a single XChaCha20-Poly1305 invocation
//! over the 64-byte word concatenation; the vector is split only for
//! transport.
//!
//! ## Nonce Construction
//! ```text
//! xnonce (24 bytes) = link nonce (16 bytes) || 0x00 * 8
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - Never reuse a (key, nonce) pair - catastrophic security failure
//! - Word order is part of the protocol; do not permute
//! - There is no hidden state here on purpose: plain value types and
//!   free functions, nothing bundles a secret with behavior
//!
//! ## Last Modified
//! v0.1.0 - Initial cipher implementation

use std::fmt;

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    XChaCha20Poly1305, XNonce,
};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use veilink_common::b64;

use super::keys::CipherKey;
use super::{CIPHERTEXT_WORDS, LINK_NONCE_SIZE, POLY1305_TAG_SIZE, XCHACHA_NONCE_SIZE};
use crate::error::{CoreError, Result};
use crate::field::FIELD_WORD_SIZE;

// ============================================
// LinkNonce
// ============================================

/// 16-byte nonce for one encode/decode round trip.
///
/// Generated fresh on the encrypting side, received verbatim from the
/// result event on the decrypting side, consumed exactly once.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkNonce(#[serde(with = "veilink_common::b64")] [u8; LINK_NONCE_SIZE]);

impl LinkNonce {
    /// Generates a fresh random nonce from the OS secure random source.
    ///
    /// # Errors
    /// Returns `Randomness` if the entropy source fails; this is fatal
    /// and must not be worked around with a predictable fallback.
    pub fn generate() -> Result<Self> {
        let mut bytes = [0u8; LINK_NONCE_SIZE];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|_| CoreError::randomness("link nonce"))?;
        Ok(Self(bytes))
    }

    /// Creates a nonce from a fixed 16-byte array (result-event side).
    #[must_use]
    pub const fn from_array(bytes: [u8; LINK_NONCE_SIZE]) -> Self {
        Self(bytes)
    }

    /// Returns the raw nonce bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; LINK_NONCE_SIZE] {
        &self.0
    }

    /// Extends the nonce into the 24-byte XChaCha20 form.
    ///
    /// The trailing 8 bytes stay zero; uniqueness comes entirely from
    /// the 128 random bits.
    fn extended(&self) -> XNonce {
        let mut xnonce = [0u8; XCHACHA_NONCE_SIZE];
        xnonce[..LINK_NONCE_SIZE].copy_from_slice(&self.0);
        XNonce::from(xnonce)
    }
}

impl fmt::Debug for LinkNonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LinkNonce({:02x}{:02x}{:02x}{:02x}...)",
            self.0[0], self.0[1], self.0[2], self.0[3]
        )
    }
}

impl fmt::Display for LinkNonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", b64::encode(&self.0))
    }
}

// ============================================
// CiphertextWord
// ============================================

/// One encrypted 128-bit field word.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CiphertextWord(#[serde(with = "veilink_common::b64")] [u8; FIELD_WORD_SIZE]);

impl CiphertextWord {
    /// Creates a word from a fixed 16-byte array.
    #[must_use]
    pub const fn from_array(bytes: [u8; FIELD_WORD_SIZE]) -> Self {
        Self(bytes)
    }

    /// Returns the raw word bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; FIELD_WORD_SIZE] {
        &self.0
    }
}

impl fmt::Debug for CiphertextWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CiphertextWord({:02x}{:02x}{:02x}{:02x}...)",
            self.0[0], self.0[1], self.0[2], self.0[3]
        )
    }
}

// ============================================
// AuthTag
// ============================================

/// The Poly1305 authentication tag over one ciphertext vector.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthTag(#[serde(with = "veilink_common::b64")] [u8; POLY1305_TAG_SIZE]);

impl AuthTag {
    /// Creates a tag from a fixed 16-byte array.
    #[must_use]
    pub const fn from_array(bytes: [u8; POLY1305_TAG_SIZE]) -> Self {
        Self(bytes)
    }

    /// Returns the raw tag bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; POLY1305_TAG_SIZE] {
        &self.0
    }
}

impl fmt::Debug for AuthTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AuthTag({:02x}{:02x}{:02x}{:02x}...)",
            self.0[0], self.0[1], self.0[2], self.0[3]
        )
    }
}

// ============================================
// CiphertextVector
// ============================================

/// Exactly four encrypted field words plus their authentication tag.
///
/// Construction through [`CiphertextVector::from_parts`] is the only
/// way to build one from untrusted input, which is where the
/// four-element invariant is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CiphertextVector {
    words: [CiphertextWord; CIPHERTEXT_WORDS],
    tag: AuthTag,
}

impl CiphertextVector {
    /// Builds a vector from an untrusted word slice and tag.
    ///
    /// # Errors
    /// Returns `MalformedCiphertext` if the slice does not contain
    /// exactly four words. This check runs before any cryptography.
    pub fn from_parts(words: &[CiphertextWord], tag: AuthTag) -> Result<Self> {
        let words: [CiphertextWord; CIPHERTEXT_WORDS] = words
            .try_into()
            .map_err(|_| CoreError::malformed_ciphertext(CIPHERTEXT_WORDS, words.len()))?;
        Ok(Self { words, tag })
    }

    /// Returns the four ciphertext words in protocol order.
    #[must_use]
    pub const fn words(&self) -> &[CiphertextWord; CIPHERTEXT_WORDS] {
        &self.words
    }

    /// Returns the authentication tag.
    #[must_use]
    pub const fn tag(&self) -> AuthTag {
        self.tag
    }
}

// ============================================
// Encrypt / Decrypt
// ============================================

/// Encrypts four 128-bit field words in one authenticated invocation.
///
/// # Arguments
/// * `key` - derived cipher key
/// * `nonce` - fresh 16-byte link nonce
/// * `words` - plaintext words in protocol order
///
/// # Errors
/// Returns `Encryption` if the cipher cannot be initialized or fails;
/// neither happens with valid inputs.
pub fn encrypt_words(
    key: &CipherKey,
    nonce: &LinkNonce,
    words: &[u128; CIPHERTEXT_WORDS],
) -> Result<CiphertextVector> {
    let cipher = XChaCha20Poly1305::new_from_slice(key.as_bytes())
        .map_err(|_| CoreError::encryption("failed to initialize cipher"))?;

    // One 64-byte message: each word as 16 big-endian bytes, in order
    let mut plaintext = [0u8; CIPHERTEXT_WORDS * FIELD_WORD_SIZE];
    for (chunk, word) in plaintext.chunks_exact_mut(FIELD_WORD_SIZE).zip(words) {
        chunk.copy_from_slice(&word.to_be_bytes());
    }

    let sealed = cipher
        .encrypt(&nonce.extended(), plaintext.as_slice())
        .map_err(|_| CoreError::encryption("XChaCha20-Poly1305 encryption failed"))?;
    plaintext.zeroize();

    // 64 bytes of ciphertext followed by the 16-byte tag
    let mut out = [CiphertextWord([0u8; FIELD_WORD_SIZE]); CIPHERTEXT_WORDS];
    for (i, word) in out.iter_mut().enumerate() {
        word.0
            .copy_from_slice(&sealed[i * FIELD_WORD_SIZE..(i + 1) * FIELD_WORD_SIZE]);
    }
    let mut tag = [0u8; POLY1305_TAG_SIZE];
    tag.copy_from_slice(&sealed[CIPHERTEXT_WORDS * FIELD_WORD_SIZE..]);

    Ok(CiphertextVector {
        words: out,
        tag: AuthTag(tag),
    })
}

/// Decrypts a ciphertext vector back into four field words.
///
/// All-or-nothing: either the tag verifies and all four words come
/// back, or the whole call fails with `Decryption`.
///
/// # Errors
/// Returns `Decryption` if authentication fails (tampered vector,
/// wrong key, or wrong nonce).
pub fn decrypt_words(
    key: &CipherKey,
    nonce: &LinkNonce,
    vector: &CiphertextVector,
) -> Result<[u128; CIPHERTEXT_WORDS]> {
    let cipher = XChaCha20Poly1305::new_from_slice(key.as_bytes())
        .map_err(|_| CoreError::Decryption)?;

    let mut sealed =
        Vec::with_capacity(CIPHERTEXT_WORDS * FIELD_WORD_SIZE + POLY1305_TAG_SIZE);
    for word in &vector.words {
        sealed.extend_from_slice(&word.0);
    }
    sealed.extend_from_slice(&vector.tag.0);

    let mut plaintext = cipher
        .decrypt(&nonce.extended(), sealed.as_slice())
        .map_err(|_| CoreError::Decryption)?;

    let mut words = [0u128; CIPHERTEXT_WORDS];
    for (word, chunk) in words.iter_mut().zip(plaintext.chunks_exact(FIELD_WORD_SIZE)) {
        let mut buf = [0u8; FIELD_WORD_SIZE];
        buf.copy_from_slice(chunk);
        *word = u128::from_be_bytes(buf);
    }
    plaintext.zeroize();

    Ok(words)
}

// ============================================
// Tests
// ============================================
