// ============================================
// File: crates/veilink-core/src/field.rs
// ============================================
//! # Field Element Split
//!
//! ## Creation Reason
//! The confidential cipher operates on 128-bit unsigned integers, so
//! every 32-byte wallet address must be decomposed into two words and
//! reassembled exactly. A wrong endianness or a swapped half would
//! silently corrupt wallet linkage, which is why this tiny module
//! exists on its own with exhaustive tests.
//!
//! ## Main Functionality
//! - `FieldPair::split`: address bytes 0-15 -> `low`, 16-31 -> `high`,
//!   both read as big-endian unsigned integers
//! - `FieldPair::join`: the exact inverse, zero-padded to 16 bytes
//!
//! ## Invariant
//! `join(split(addr)) == addr` for every address, bit for bit. All
//! conversions are explicit fixed-width byte operations; no string or
//! big-integer formatting is ever involved.
//!
//! ## Last Modified
//! v0.1.0 - Initial implementation

use veilink_common::types::{WalletAddress, WALLET_ADDRESS_SIZE};

/// Size of one field word in bytes (128 bits).
pub const FIELD_WORD_SIZE: usize = 16;

// ============================================
// FieldPair
// ============================================

/// The decomposition of one wallet address into two 128-bit words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPair {
    /// Address bytes 0-15 as a big-endian unsigned integer.
    pub low: u128,
    /// Address bytes 16-31 as a big-endian unsigned integer.
    pub high: u128,
}

impl FieldPair {
    /// Splits a wallet address into its `(low, high)` word pair.
    #[must_use]
    pub fn split(address: &WalletAddress) -> Self {
        let bytes = address.as_bytes();

        let mut low = [0u8; FIELD_WORD_SIZE];
        let mut high = [0u8; FIELD_WORD_SIZE];
        low.copy_from_slice(&bytes[..FIELD_WORD_SIZE]);
        high.copy_from_slice(&bytes[FIELD_WORD_SIZE..]);

        Self {
            low: u128::from_be_bytes(low),
            high: u128::from_be_bytes(high),
        }
    }

    /// Reassembles the original wallet address from this word pair.
    ///
    /// Each word is written as 16 big-endian bytes (zero-padded), low
    /// half first.
    #[must_use]
    pub fn join(&self) -> WalletAddress {
        let mut bytes = [0u8; WALLET_ADDRESS_SIZE];
        bytes[..FIELD_WORD_SIZE].copy_from_slice(&self.low.to_be_bytes());
        bytes[FIELD_WORD_SIZE..].copy_from_slice(&self.high.to_be_bytes());
        WalletAddress::from_array(bytes)
    }

    /// Creates a pair directly from two words.
    #[must_use]
    pub const fn from_words(low: u128, high: u128) -> Self {
        Self { low, high }
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_join_roundtrip() {
        let mut bytes = [0u8; 32];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = i as u8;
        }
        let addr = WalletAddress::from_array(bytes);

        let pair = FieldPair::split(&addr);
        assert_eq!(pair.join(), addr);
    }

    #[test]
    fn test_known_split_values() {
        // Last byte 1: low half all zero, high half == 1
        let mut a = [0u8; 32];
        a[31] = 1;
        let pair_a = FieldPair::split(&WalletAddress::from_array(a));
        assert_eq!(pair_a.low, 0);
        assert_eq!(pair_a.high, 1);

        // Last byte 2
        let mut b = [0u8; 32];
        b[31] = 2;
        let pair_b = FieldPair::split(&WalletAddress::from_array(b));
        assert_eq!(pair_b.low, 0);
        assert_eq!(pair_b.high, 2);
    }

    #[test]
    fn test_split_is_big_endian() {
        // Byte 0 is the most significant byte of `low`
        let mut bytes = [0u8; 32];
        bytes[0] = 0x01;
        let pair = FieldPair::split(&WalletAddress::from_array(bytes));
        assert_eq!(pair.low, 1u128 << 120);
        assert_eq!(pair.high, 0);

        // Byte 16 is the most significant byte of `high`
        let mut bytes = [0u8; 32];
        bytes[16] = 0x01;
        let pair = FieldPair::split(&WalletAddress::from_array(bytes));
        assert_eq!(pair.low, 0);
        assert_eq!(pair.high, 1u128 << 120);
    }

    #[test]
    fn test_join_zero_pads() {
        let pair = FieldPair::from_words(0, 0x2a);
        let addr = pair.join();

        // Everything except the last byte must be zero
        assert_eq!(&addr.as_bytes()[..31], &[0u8; 31]);
        assert_eq!(addr.as_bytes()[31], 0x2a);
    }

    #[test]
    fn test_extreme_values() {
        let pair = FieldPair::from_words(u128::MAX, 0);
        let addr = pair.join();
        assert_eq!(&addr.as_bytes()[..16], &[0xFF; 16]);
        assert_eq!(&addr.as_bytes()[16..], &[0x00; 16]);
        assert_eq!(FieldPair::split(&addr), pair);

        let pair = FieldPair::from_words(u128::MAX, u128::MAX);
        assert_eq!(FieldPair::split(&pair.join()), pair);
    }
}
