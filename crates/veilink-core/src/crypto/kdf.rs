// ============================================
// File: crates/veilink-core/src/crypto/kdf.rs
// ============================================
//! # Cipher-Key Derivation
//!
//! ## Creation Reason
//! The raw X25519 shared secret is never used as a cipher key
//! directly; HKDF-SHA256 with a domain-separation salt and both
//! public keys in the info parameter produces the symmetric key.
//!
//! ## Key Binding
//! Including the session and cluster public keys in the info
//! parameter binds the derived key to this exact exchange, so the
//! same shared secret can never yield the same cipher key for a
//! different key pairing.
//!
//! ## Last Modified
//! v0.1.0 - Initial implementation

use hkdf::Hkdf;
use sha2::Sha256;
use tracing::trace;
use zeroize::Zeroize;

use super::keys::{CipherKey, ClusterPublicKey, SessionPublicKey, SharedSecret};
use super::{CIPHER_KEY_SIZE, HKDF_INFO_PREFIX, HKDF_SALT, X25519_PUBLIC_KEY_SIZE};
use crate::error::{CoreError, Result};

// ============================================
// Key Derivation
// ============================================

/// Derives the symmetric cipher key from an X25519 shared secret.
///
/// # Arguments
/// * `shared_secret` - 32-byte Diffie-Hellman output
/// * `session_public` - the session public key sent with the request
/// * `cluster_key` - the cluster's long-lived public key
///
/// # Derivation
/// ```text
/// cipher_key = HKDF-SHA256(
///     ikm:  shared_secret,
///     salt: "veilink-v1",
///     info: "veilink-cipher-key" || session_public || cluster_public
/// )
/// ```
///
/// # Errors
/// Returns `KeyDerivation` if HKDF expansion fails.
pub fn derive_cipher_key(
    shared_secret: &SharedSecret,
    session_public: &SessionPublicKey,
    cluster_key: &ClusterPublicKey,
) -> Result<CipherKey> {
    // Build info parameter: prefix || session_public || cluster_public
    let mut info =
        Vec::with_capacity(HKDF_INFO_PREFIX.len() + X25519_PUBLIC_KEY_SIZE * 2);
    info.extend_from_slice(HKDF_INFO_PREFIX);
    info.extend_from_slice(session_public.as_bytes());
    info.extend_from_slice(cluster_key.as_bytes());

    let hk = Hkdf::<Sha256>::new(Some(HKDF_SALT), shared_secret.as_bytes());

    let mut key_bytes = [0u8; CIPHER_KEY_SIZE];
    hk.expand(&info, &mut key_bytes)
        .map_err(|_| CoreError::key_derivation("HKDF expansion failed"))?;

    info.zeroize();
    trace!(session_public = %session_public, "Cipher key derived");

    Ok(CipherKey::from_bytes(key_bytes))
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_inputs() -> (SharedSecret, SessionPublicKey, ClusterPublicKey) {
        (
            SharedSecret::from_bytes([0x42; 32]),
            SessionPublicKey::from_array([0x01; 32]),
            ClusterPublicKey::from_array([0x02; 32]),
        )
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let (shared, session, cluster) = fixed_inputs();
        let k1 = derive_cipher_key(&shared, &session, &cluster).unwrap();
        let k2 = derive_cipher_key(&shared, &session, &cluster).unwrap();
        assert_eq!(k1, k2);
    }

    #[test]
    fn test_derived_key_is_not_the_secret() {
        let (shared, session, cluster) = fixed_inputs();
        let key = derive_cipher_key(&shared, &session, &cluster).unwrap();
        assert_ne!(key.as_bytes(), shared.as_bytes());
        assert_ne!(key.as_bytes(), &[0u8; 32]);
    }

    #[test]
    fn test_public_keys_bind_the_key() {
        let (shared, session, cluster) = fixed_inputs();
        let other_cluster = ClusterPublicKey::from_array([0x03; 32]);

        let k1 = derive_cipher_key(&shared, &session, &cluster).unwrap();
        let k2 = derive_cipher_key(&shared, &session, &other_cluster).unwrap();
        assert_ne!(k1, k2);
    }

    #[test]
    fn test_key_order_matters() {
        let shared = SharedSecret::from_bytes([0x42; 32]);
        let a = [0x01; 32];
        let b = [0x02; 32];

        let k1 = derive_cipher_key(
            &shared,
            &SessionPublicKey::from_array(a),
            &ClusterPublicKey::from_array(b),
        )
        .unwrap();
        let k2 = derive_cipher_key(
            &shared,
            &SessionPublicKey::from_array(b),
            &ClusterPublicKey::from_array(a),
        )
        .unwrap();
        assert_ne!(k1, k2);
    }
}
