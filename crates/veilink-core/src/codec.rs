// ============================================
// File: crates/veilink-core/src/codec.rs
// ============================================
//! # Link Encode / Decode Operations
//!
//! ## Creation Reason
//! Composes field splitting, key agreement, key derivation and the
//! authenticated cipher into the two operations the rest of the
//! system uses: encoding a wallet-address pair for submission to the
//! confidential-computation cluster, and decoding the result event.
//!
//! ## Main Logical Flow (encode)
//! 1. Fresh session key pair from the OS CSPRNG
//! 2. X25519 agreement against the cluster key
//! 3. HKDF -> cipher key
//! 4. Big-endian split of both addresses
//! 5. Fresh 16-byte nonce, one authenticated cipher invocation over
//!    `[lowA, highA, lowB, highB]`
//!
//! ## Statelessness
//! The codec keeps nothing between calls. The returned cipher key is
//! the only thing a caller must retain to decode the matching result
//! event later; holding it is the caller's job (see the pending-link
//! store in `veilink-client`).
//!
//! ## Last Modified
//! v0.1.0 - Initial implementation

use tracing::debug;

use veilink_common::types::WalletAddress;

use crate::crypto::cipher::{
    decrypt_words, encrypt_words, AuthTag, CiphertextVector, CiphertextWord, LinkNonce,
};
use crate::crypto::kdf::derive_cipher_key;
use crate::crypto::keys::{CipherKey, ClusterPublicKey, SessionKeyPair, SessionPublicKey};
use crate::error::Result;
use crate::field::FieldPair;

// ============================================
// EncodedLink
// ============================================

/// Everything one encode produces.
///
/// `ciphertext`, `session_public_key` and `nonce` travel to the
/// cluster with the request; `cipher_key` stays local and is the
/// context needed to decode the eventual result event.
#[derive(Debug)]
pub struct EncodedLink {
    /// The four encrypted field words plus tag.
    pub ciphertext: CiphertextVector,
    /// Public half of the session key pair, for the cluster to
    /// rederive the shared secret.
    pub session_public_key: SessionPublicKey,
    /// The nonce the words were encrypted under.
    pub nonce: LinkNonce,
    /// Locally retained decryption context. Never transmitted.
    pub cipher_key: CipherKey,
}

// ============================================
// Encode
// ============================================

/// Encodes a pair of wallet addresses for confidential submission.
///
/// Word order in the ciphertext is fixed and semantically meaningful:
/// `[lowA, highA, lowB, highB]`.
///
/// # Errors
/// - `Randomness` if the OS entropy source fails
/// - `KeyAgreement` if the cluster key is invalid (low-order point)
/// - `KeyDerivation` / `Encryption` on primitive failure
pub fn encode_link(
    addr_a: &WalletAddress,
    addr_b: &WalletAddress,
    cluster_key: &ClusterPublicKey,
) -> Result<EncodedLink> {
    let session = SessionKeyPair::generate();
    let session_public_key = session.public_key();

    let shared = session.agree(cluster_key)?;
    let cipher_key = derive_cipher_key(&shared, &session_public_key, cluster_key)?;

    let pair_a = FieldPair::split(addr_a);
    let pair_b = FieldPair::split(addr_b);

    let nonce = LinkNonce::generate()?;
    let ciphertext = encrypt_words(
        &cipher_key,
        &nonce,
        &[pair_a.low, pair_a.high, pair_b.low, pair_b.high],
    )?;

    debug!(session_public = %session_public_key, "Wallet pair encoded");

    Ok(EncodedLink {
        ciphertext,
        session_public_key,
        nonce,
        cipher_key,
    })
}

// ============================================
// Decode
// ============================================

/// Decodes a computation-result event back into the address pair.
///
/// `words` and `tag` are taken verbatim from the event; `cipher_key`
/// is the context retained since the matching encode. The call is
/// all-or-nothing: a malformed vector or failed authentication
/// returns an error and no address material.
///
/// # Errors
/// - `MalformedCiphertext` if `words` does not contain exactly four
///   elements (checked before any cryptography)
/// - `Decryption` if the tag does not verify
pub fn decode_link(
    cipher_key: &CipherKey,
    nonce: &LinkNonce,
    words: &[CiphertextWord],
    tag: AuthTag,
) -> Result<(WalletAddress, WalletAddress)> {
    let vector = CiphertextVector::from_parts(words, tag)?;
    let [low_a, high_a, low_b, high_b] = decrypt_words(cipher_key, nonce, &vector)?;

    let addr_a = FieldPair::from_words(low_a, high_a).join();
    let addr_b = FieldPair::from_words(low_b, high_b).join();
    Ok((addr_a, addr_b))
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::SharedSecret;
    use crate::error::CoreError;
    use rand::rngs::OsRng;
    use x25519_dalek::{PublicKey as X25519PublicKey, StaticSecret};

    /// A fixed cluster key pair standing in for the remote network.
    fn test_cluster() -> (StaticSecret, ClusterPublicKey) {
        let secret = StaticSecret::random_from_rng(OsRng);
        let public = ClusterPublicKey::from_array(X25519PublicKey::from(&secret).to_bytes());
        (secret, public)
    }

    fn addr(last_byte: u8) -> WalletAddress {
        let mut bytes = [0u8; 32];
        bytes[31] = last_byte;
        WalletAddress::from_array(bytes)
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let (_, cluster) = test_cluster();
        let a = addr(1);
        let b = addr(2);

        let encoded = encode_link(&a, &b, &cluster).unwrap();
        let (out_a, out_b) = decode_link(
            &encoded.cipher_key,
            &encoded.nonce,
            encoded.ciphertext.words(),
            encoded.ciphertext.tag(),
        )
        .unwrap();

        assert_eq!(out_a, a);
        assert_eq!(out_b, b);
    }

    #[test]
    fn test_known_split_before_encryption() {
        // addrA = 0x00..01, addrB = 0x00..02 must split to
        // (lowA=0, highA=1, lowB=0, highB=2)
        let pair_a = FieldPair::split(&addr(1));
        let pair_b = FieldPair::split(&addr(2));
        assert_eq!((pair_a.low, pair_a.high), (0, 1));
        assert_eq!((pair_b.low, pair_b.high), (0, 2));
    }

    #[test]
    fn test_order_is_preserved() {
        let (_, cluster) = test_cluster();
        let a = addr(1);
        let b = addr(2);

        let encoded = encode_link(&b, &a, &cluster).unwrap();
        let (out_first, out_second) = decode_link(
            &encoded.cipher_key,
            &encoded.nonce,
            encoded.ciphertext.words(),
            encoded.ciphertext.tag(),
        )
        .unwrap();

        // Swapped input comes back swapped, never silently permuted
        assert_eq!(out_first, b);
        assert_eq!(out_second, a);
    }

    #[test]
    fn test_encodes_are_not_deterministic() {
        let (_, cluster) = test_cluster();
        let a = addr(1);
        let b = addr(2);

        let e1 = encode_link(&a, &b, &cluster).unwrap();
        let e2 = encode_link(&a, &b, &cluster).unwrap();

        // Fresh randomness per call: different nonce, different
        // session key, different ciphertext
        assert_ne!(e1.nonce, e2.nonce);
        assert_ne!(
            e1.session_public_key.as_bytes(),
            e2.session_public_key.as_bytes()
        );
        assert_ne!(e1.ciphertext.words(), e2.ciphertext.words());
    }

    #[test]
    fn test_malformed_vector_rejected() {
        let (_, cluster) = test_cluster();
        let encoded = encode_link(&addr(1), &addr(2), &cluster).unwrap();

        let three_words = &encoded.ciphertext.words()[..3];
        let result = decode_link(
            &encoded.cipher_key,
            &encoded.nonce,
            three_words,
            encoded.ciphertext.tag(),
        );
        assert!(matches!(
            result,
            Err(CoreError::MalformedCiphertext {
                expected: 4,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_tampered_ciphertext_rejected() {
        let (_, cluster) = test_cluster();
        let encoded = encode_link(&addr(1), &addr(2), &cluster).unwrap();

        let mut words = *encoded.ciphertext.words();
        let mut bytes = *words[0].as_bytes();
        bytes[7] ^= 0x80;
        words[0] = CiphertextWord::from_array(bytes);

        let result = decode_link(
            &encoded.cipher_key,
            &encoded.nonce,
            &words,
            encoded.ciphertext.tag(),
        );
        assert!(matches!(result, Err(CoreError::Decryption)));
    }

    #[test]
    fn test_cluster_side_can_decrypt_submission() {
        // The cluster, holding its static secret and the transmitted
        // session public key, must derive the same cipher key.
        let (cluster_secret, cluster_public) = test_cluster();
        let a = addr(0x11);
        let b = addr(0x22);

        let encoded = encode_link(&a, &b, &cluster_public).unwrap();

        let dh = cluster_secret.diffie_hellman(&X25519PublicKey::from(
            *encoded.session_public_key.as_bytes(),
        ));
        let shared = SharedSecret::from_bytes(*dh.as_bytes());
        let remote_key = derive_cipher_key(
            &shared,
            &encoded.session_public_key,
            &cluster_public,
        )
        .unwrap();

        let (out_a, out_b) = decode_link(
            &remote_key,
            &encoded.nonce,
            encoded.ciphertext.words(),
            encoded.ciphertext.tag(),
        )
        .unwrap();
        assert_eq!(out_a, a);
        assert_eq!(out_b, b);
    }

    #[test]
    fn test_invalid_cluster_key_is_fatal() {
        let zero = ClusterPublicKey::from_array([0u8; 32]);
        let result = encode_link(&addr(1), &addr(2), &zero);
        assert!(matches!(result, Err(CoreError::KeyAgreement { .. })));
    }
}
