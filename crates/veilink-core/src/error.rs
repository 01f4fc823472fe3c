// ============================================
// File: crates/veilink-core/src/error.rs
// ============================================
//! # Core Error Types
//!
//! ## Creation Reason
//! Defines the error taxonomy of the confidential field codec. The
//! split between fatal and recoverable variants matters to callers:
//! randomness and key-agreement failures mean the local environment is
//! broken, while malformed or tampered ciphertexts only mean one
//! result event must be discarded.
//!
//! ## Error Categories
//! 1. **Fatal**: `Randomness`, `KeyAgreement`, `KeyDerivation`
//! 2. **Recoverable**: `MalformedCiphertext`, `Decryption`
//!
//! ## ⚠️ Important Note for Next Developer
//! - NEVER include key material in error messages
//! - The codec never retries; retries belong to the transport layer
//!
//! ## Last Modified
//! v0.1.0 - Initial error definitions

use thiserror::Error;

use veilink_common::error::CommonError;

// ============================================
// Result Type Alias
// ============================================

/// Result type for core codec operations.
pub type Result<T> = std::result::Result<T, CoreError>;

// ============================================
// CoreError
// ============================================

/// Error types for the confidential field codec.
#[derive(Error, Debug)]
pub enum CoreError {
    // ========================================
    // Fatal Errors
    // ========================================
    /// The secure random source failed. Cannot proceed without entropy.
    #[error("Secure randomness unavailable: {context}")]
    Randomness {
        /// What was being generated.
        context: String,
    },

    /// Key agreement failed (malformed or low-order cluster key).
    #[error("Key agreement failed: {reason}")]
    KeyAgreement {
        /// Why the exchange was rejected.
        reason: String,
    },

    /// Cipher-key derivation from the shared secret failed.
    #[error("Key derivation failed: {reason}")]
    KeyDerivation {
        /// Why derivation failed.
        reason: String,
    },

    /// Encryption failed (should not happen with valid inputs).
    #[error("Encryption failed: {context}")]
    Encryption {
        /// What was being encrypted.
        context: String,
    },

    // ========================================
    // Recoverable Errors
    // ========================================
    /// The ciphertext vector does not have exactly four elements.
    ///
    /// The result event is garbage; reject it without touching state.
    #[error("Malformed ciphertext: expected {expected} words, got {actual}")]
    MalformedCiphertext {
        /// Expected number of ciphertext words.
        expected: usize,
        /// Actual number received.
        actual: usize,
    },

    /// Authentication failed during decryption.
    ///
    /// The ciphertext was tampered with, or the wrong key/nonce pair
    /// was used. Treat as an integrity violation and discard the event.
    #[error("Decryption failed: authentication error")]
    Decryption,

    // ========================================
    // Wrapped Errors
    // ========================================
    /// Error from the common crate.
    #[error(transparent)]
    Common(#[from] CommonError),
}

impl CoreError {
    /// Creates a `Randomness` error.
    pub fn randomness(context: impl Into<String>) -> Self {
        Self::Randomness {
            context: context.into(),
        }
    }

    /// Creates a `KeyAgreement` error.
    pub fn key_agreement(reason: impl Into<String>) -> Self {
        Self::KeyAgreement {
            reason: reason.into(),
        }
    }

    /// Creates a `KeyDerivation` error.
    pub fn key_derivation(reason: impl Into<String>) -> Self {
        Self::KeyDerivation {
            reason: reason.into(),
        }
    }

    /// Creates an `Encryption` error.
    pub fn encryption(context: impl Into<String>) -> Self {
        Self::Encryption {
            context: context.into(),
        }
    }

    /// Creates a `MalformedCiphertext` error.
    #[must_use]
    pub const fn malformed_ciphertext(expected: usize, actual: usize) -> Self {
        Self::MalformedCiphertext { expected, actual }
    }

    // ========================================
    // Error Classification
    // ========================================

    /// Returns `true` if the caller can recover by discarding the
    /// offending result event.
    ///
    /// Everything else means the local environment (entropy source,
    /// cluster key material) is broken.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::MalformedCiphertext { .. } | Self::Decryption)
    }

    /// Returns `true` if this error might indicate an attack.
    ///
    /// These errors warrant additional logging/monitoring.
    #[must_use]
    pub const fn is_suspicious(&self) -> bool {
        matches!(self, Self::Decryption | Self::KeyAgreement { .. })
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::malformed_ciphertext(4, 3);
        assert!(err.to_string().contains('4'));
        assert!(err.to_string().contains('3'));

        let err = CoreError::Decryption;
        assert!(err.to_string().contains("authentication"));
    }

    #[test]
    fn test_error_classification() {
        assert!(CoreError::Decryption.is_recoverable());
        assert!(CoreError::Decryption.is_suspicious());
        assert!(CoreError::malformed_ciphertext(4, 5).is_recoverable());

        assert!(!CoreError::randomness("nonce").is_recoverable());
        assert!(!CoreError::key_derivation("expand failed").is_recoverable());
        assert!(CoreError::key_agreement("low-order point").is_suspicious());
    }

    #[test]
    fn test_common_error_conversion() {
        let common = CommonError::invalid_length(32, 7);
        let core: CoreError = common.into();
        assert!(matches!(core, CoreError::Common(_)));
    }
}
