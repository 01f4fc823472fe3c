// ============================================
// File: crates/veilink-client/src/link.rs
// ============================================
//! # Link Envelopes & Service
//!
//! ## Creation Reason
//! Defines the serialized shapes crossing the boundary to the
//! computation cluster and the `LinkService` that ties the codec and
//! the pending store together into the two calls the host
//! application makes.
//!
//! ## Main Functionality
//! - `LinkRequest`: outbound envelope handed to the transport
//! - `LinkResult`: inbound result-event shape
//! - `LinkService::begin_link` / `LinkService::complete_link`
//!
//! ## ⚠️ Important Note for Next Developer
//! - `LinkResult::words` is deliberately variable-length: a malformed
//!   event must be representable so the codec can reject it, rather
//!   than failing opaquely in deserialization
//! - A failed decode still consumes the pending entry; the retained
//!   context is single-use either way
//!
//! ## Last Modified
//! v0.1.0 - Initial implementation

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use veilink_common::types::{RequestId, WalletAddress};
use veilink_core::codec::{decode_link, encode_link};
use veilink_core::crypto::cipher::{AuthTag, CiphertextWord, LinkNonce};
use veilink_core::crypto::keys::{ClusterPublicKey, SessionPublicKey};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::pending::PendingLinks;

// ============================================
// LinkRequest
// ============================================

/// Outbound envelope for one confidential link request.
///
/// Everything the cluster needs: the session public key to rederive
/// the shared secret, the nonce, and the encrypted word vector with
/// its tag. The session secret and the derived cipher key never
/// appear here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkRequest {
    /// Correlates this request with its eventual result event.
    pub request_id: RequestId,
    /// Public half of the per-request session key pair.
    pub session_public_key: SessionPublicKey,
    /// The nonce the words were encrypted under.
    pub nonce: LinkNonce,
    /// The four encrypted field words in protocol order.
    pub words: Vec<CiphertextWord>,
    /// Authentication tag over the word vector.
    pub tag: AuthTag,
}

// ============================================
// LinkResult
// ============================================

/// Inbound computation-result event.
///
/// Field contents are taken verbatim from the event; nothing here is
/// trusted until the codec has authenticated it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkResult {
    /// The request this result answers.
    pub request_id: RequestId,
    /// The nonce the result words were encrypted under.
    pub nonce: LinkNonce,
    /// The encrypted field words; length is validated by the codec.
    pub words: Vec<CiphertextWord>,
    /// Authentication tag over the word vector.
    pub tag: AuthTag,
}

// ============================================
// LinkService
// ============================================

/// The client-facing surface of Veilink.
///
/// Composes the codec with the pending-link store. Stateless apart
/// from the store; safe to share behind an `Arc`.
///
/// # Example
/// ```no_run
/// use veilink_client::{ClientConfig, LinkService};
/// use veilink_common::types::WalletAddress;
/// use veilink_core::crypto::keys::ClusterPublicKey;
///
/// # fn main() -> veilink_client::Result<()> {
/// let cluster_key = ClusterPublicKey::from_array([0; 32]); // from metadata lookup
/// let service = LinkService::new(ClientConfig::new(cluster_key))?;
///
/// let request = service.begin_link(
///     &WalletAddress::from_array([1; 32]),
///     &WalletAddress::from_array([2; 32]),
/// )?;
/// // hand `request` to the transport; later, feed the result event
/// // to `service.complete_link(..)`
/// # Ok(())
/// # }
/// ```
pub struct LinkService {
    cluster_key: ClusterPublicKey,
    pending: PendingLinks,
}

impl LinkService {
    /// Creates a service from a validated configuration.
    ///
    /// # Errors
    /// Returns `ConfigInvalid` if the configuration fails validation.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            cluster_key: config.cluster_key,
            pending: PendingLinks::new(config.max_pending, config.link_ttl()),
        })
    }

    /// Encodes a wallet-address pair and registers it as in flight.
    ///
    /// # Errors
    /// Propagates codec failures (`Randomness`, `KeyAgreement`) and
    /// `PendingLimitReached` when too many requests are unanswered.
    pub fn begin_link(
        &self,
        addr_a: &WalletAddress,
        addr_b: &WalletAddress,
    ) -> Result<LinkRequest> {
        let request_id = RequestId::generate();
        let encoded = encode_link(addr_a, addr_b, &self.cluster_key)?;

        self.pending.insert(request_id, encoded.cipher_key)?;
        info!(request_id = %request_id, "Link request prepared");

        Ok(LinkRequest {
            request_id,
            session_public_key: encoded.session_public_key,
            nonce: encoded.nonce,
            words: encoded.ciphertext.words().to_vec(),
            tag: encoded.ciphertext.tag(),
        })
    }

    /// Consumes a result event, returning the recovered address pair.
    ///
    /// # Errors
    /// - `UnknownRequest` if no pending entry matches (never issued,
    ///   expired, or already consumed)
    /// - `MalformedCiphertext` / `Decryption` from the codec; the
    ///   pending entry is consumed regardless
    pub fn complete_link(
        &self,
        result: &LinkResult,
    ) -> Result<(WalletAddress, WalletAddress)> {
        let pending = self
            .pending
            .take(&result.request_id)
            .ok_or(ClientError::UnknownRequest(result.request_id))?;

        match decode_link(&pending.cipher_key, &result.nonce, &result.words, result.tag) {
            Ok(addresses) => {
                info!(request_id = %result.request_id, "Link result decoded");
                Ok(addresses)
            }
            Err(err) => {
                warn!(
                    request_id = %result.request_id,
                    error = %err,
                    "Link result rejected"
                );
                Err(err.into())
            }
        }
    }

    /// Returns the number of requests awaiting results.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Evicts expired pending requests, returning how many.
    pub fn cleanup_expired(&self) -> usize {
        self.pending.cleanup_expired()
    }
}

impl std::fmt::Debug for LinkService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkService")
            .field("cluster_key", &self.cluster_key)
            .field("pending", &self.pending)
            .finish()
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;
    use std::time::Duration;
    use veilink_core::error::CoreError;
    use x25519_dalek::{PublicKey as X25519PublicKey, StaticSecret};

    fn test_service() -> LinkService {
        let cluster_secret = StaticSecret::random_from_rng(OsRng);
        let cluster_key =
            ClusterPublicKey::from_array(X25519PublicKey::from(&cluster_secret).to_bytes());
        LinkService::new(ClientConfig::new(cluster_key)).unwrap()
    }

    fn addr(last_byte: u8) -> WalletAddress {
        let mut bytes = [0u8; 32];
        bytes[31] = last_byte;
        WalletAddress::from_array(bytes)
    }

    /// Plays the cluster's role: echo the request ciphertext back as
    /// a result event, exactly what the identity computation does.
    fn echo_result(request: &LinkRequest) -> LinkResult {
        LinkResult {
            request_id: request.request_id,
            nonce: request.nonce,
            words: request.words.clone(),
            tag: request.tag,
        }
    }

    #[test]
    fn test_full_round_trip() {
        let service = test_service();
        let a = addr(1);
        let b = addr(2);

        let request = service.begin_link(&a, &b).unwrap();
        assert_eq!(request.words.len(), 4);
        assert_eq!(service.pending_count(), 1);

        let (out_a, out_b) = service.complete_link(&echo_result(&request)).unwrap();
        assert_eq!((out_a, out_b), (a, b));
        assert_eq!(service.pending_count(), 0);
    }

    #[test]
    fn test_unknown_request_rejected() {
        let service = test_service();
        let request = service.begin_link(&addr(1), &addr(2)).unwrap();

        let mut result = echo_result(&request);
        result.request_id = RequestId::from_raw(0xDEAD);

        assert!(matches!(
            service.complete_link(&result),
            Err(ClientError::UnknownRequest(_))
        ));

        // The real entry is still pending
        assert_eq!(service.pending_count(), 1);
    }

    #[test]
    fn test_result_consumed_exactly_once() {
        let service = test_service();
        let request = service.begin_link(&addr(1), &addr(2)).unwrap();
        let result = echo_result(&request);

        assert!(service.complete_link(&result).is_ok());
        assert!(matches!(
            service.complete_link(&result),
            Err(ClientError::UnknownRequest(_))
        ));
    }

    #[test]
    fn test_tampered_result_rejected_and_consumed() {
        let service = test_service();
        let request = service.begin_link(&addr(1), &addr(2)).unwrap();

        let mut result = echo_result(&request);
        let mut bytes = *result.words[1].as_bytes();
        bytes[3] ^= 0x10;
        result.words[1] = CiphertextWord::from_array(bytes);

        assert!(matches!(
            service.complete_link(&result),
            Err(ClientError::Core(CoreError::Decryption))
        ));

        // The context is gone either way
        assert_eq!(service.pending_count(), 0);
    }

    #[test]
    fn test_malformed_result_rejected() {
        let service = test_service();
        let request = service.begin_link(&addr(1), &addr(2)).unwrap();

        let mut result = echo_result(&request);
        result.words.truncate(2);

        assert!(matches!(
            service.complete_link(&result),
            Err(ClientError::Core(CoreError::MalformedCiphertext {
                expected: 4,
                actual: 2
            }))
        ));
    }

    #[test]
    fn test_pending_limit_enforced() {
        let cluster_secret = StaticSecret::random_from_rng(OsRng);
        let cluster_key =
            ClusterPublicKey::from_array(X25519PublicKey::from(&cluster_secret).to_bytes());
        let mut config = ClientConfig::new(cluster_key);
        config.max_pending = 1;
        let service = LinkService::new(config).unwrap();

        service.begin_link(&addr(1), &addr(2)).unwrap();
        assert!(matches!(
            service.begin_link(&addr(3), &addr(4)),
            Err(ClientError::PendingLimitReached { limit: 1 })
        ));
    }

    #[test]
    fn test_expired_request_cannot_complete() {
        let cluster_secret = StaticSecret::random_from_rng(OsRng);
        let cluster_key =
            ClusterPublicKey::from_array(X25519PublicKey::from(&cluster_secret).to_bytes());
        let mut config = ClientConfig::new(cluster_key);
        config.link_ttl_secs = 1;
        let service = LinkService::new(config).unwrap();

        let request = service.begin_link(&addr(1), &addr(2)).unwrap();

        std::thread::sleep(Duration::from_millis(1100));
        assert_eq!(service.cleanup_expired(), 1);

        assert!(matches!(
            service.complete_link(&echo_result(&request)),
            Err(ClientError::UnknownRequest(_))
        ));
    }

    #[test]
    fn test_request_envelope_json_roundtrip() {
        let service = test_service();
        let request = service.begin_link(&addr(1), &addr(2)).unwrap();

        let json = serde_json::to_string(&request).unwrap();
        let restored: LinkRequest = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.request_id, request.request_id);
        assert_eq!(restored.words, request.words);
        assert_eq!(restored.tag, request.tag);
        assert_eq!(restored.nonce, request.nonce);

        // Secrets never serialize: the envelope is only public data
        assert!(!json.contains("cipher_key"));
    }

    #[test]
    fn test_result_envelope_json_roundtrip() {
        let result = LinkResult {
            request_id: RequestId::from_raw(9),
            nonce: LinkNonce::from_array([0x0F; 16]),
            words: vec![CiphertextWord::from_array([0x33; 16]); 4],
            tag: AuthTag::from_array([0x44; 16]),
        };

        let json = serde_json::to_string(&result).unwrap();
        let restored: LinkResult = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.words, result.words);
        assert_eq!(restored.request_id, result.request_id);
    }
}
