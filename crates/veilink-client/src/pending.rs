// ============================================
// File: crates/veilink-client/src/pending.rs
// ============================================
//! # Pending-Link Store
//!
//! ## Creation Reason
//! Encode and decode happen on opposite sides of an asynchronous
//! round trip to the computation cluster, so the cipher key derived
//! at encode time must be held somewhere until the result event
//! arrives. This store is that somewhere: a concurrent map from
//! request id to retained context, bounded in size and expired by
//! age.
//!
//! ## Entry Lifecycle
//! ```text
//! ┌──────────┐   begin_link    ┌──────────┐
//! │  (none)  │ ──────────────► │ Pending  │
//! └──────────┘                 └────┬─────┘
//!                                   │
//!                   ┌───────────────┼───────────────┐
//!                   ▼               ▼               ▼
//!             result event      TTL expiry     never answered
//!             (take: consumed   (cleanup        (evicted lazily
//!              exactly once)     evicts)         when full)
//! ```
//!
//! ## Capacity Accounting
//! The bound is enforced through an atomic slot counter, not through
//! `DashMap::len()`: a slot is reserved before the map insert and
//! released when the entry leaves the map, so concurrent inserts can
//! never overshoot `max_pending`.
//!
//! ## ⚠️ Important Note for Next Developer
//! - `take` removes the entry even if the subsequent decode fails;
//!   a cipher-key/nonce context is single-use either way
//! - Entries are immutable after insertion, so the map needs no
//!   per-entry locking
//! - Every path that removes an entry MUST release its slot exactly
//!   once; the counter and the map drift apart otherwise
//!
//! ## Last Modified
//! v0.1.0 - Initial implementation

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, info};

use veilink_common::types::RequestId;
use veilink_core::crypto::keys::CipherKey;

use crate::error::{ClientError, Result};

// ============================================
// PendingLink
// ============================================

/// One in-flight link request: the retained decryption context and
/// its creation instant.
pub struct PendingLink {
    /// The request this context belongs to.
    pub request_id: RequestId,
    /// The cipher key derived at encode time.
    pub cipher_key: CipherKey,
    created_at: Instant,
}

impl PendingLink {
    fn new(request_id: RequestId, cipher_key: CipherKey) -> Self {
        Self {
            request_id,
            cipher_key,
            created_at: Instant::now(),
        }
    }

    /// Returns how long this request has been awaiting its result.
    #[must_use]
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    /// Returns `true` if the entry has outlived the given TTL.
    #[must_use]
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.age() > ttl
    }
}

impl std::fmt::Debug for PendingLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // cipher_key intentionally omitted
        f.debug_struct("PendingLink")
            .field("request_id", &self.request_id)
            .field("age", &self.age())
            .finish_non_exhaustive()
    }
}

// ============================================
// PendingLinks
// ============================================

/// Bounded, expiring store of all in-flight link requests.
///
/// Thread-safe without external locking; safe to share behind an
/// `Arc` across request-handling tasks.
pub struct PendingLinks {
    links: DashMap<RequestId, PendingLink>,
    occupied: AtomicUsize,
    max_pending: usize,
    ttl: Duration,
}

impl PendingLinks {
    /// Creates a store with the given capacity bound and entry TTL.
    #[must_use]
    pub fn new(max_pending: usize, ttl: Duration) -> Self {
        Self {
            links: DashMap::new(),
            occupied: AtomicUsize::new(0),
            max_pending,
            ttl,
        }
    }

    /// Atomically claims one capacity slot, failing at the bound.
    fn try_reserve_slot(&self) -> bool {
        self.occupied
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |occupied| {
                (occupied < self.max_pending).then_some(occupied + 1)
            })
            .is_ok()
    }

    /// Returns a slot claimed by `try_reserve_slot`.
    fn release_slot(&self) {
        self.occupied.fetch_sub(1, Ordering::AcqRel);
    }

    /// Registers the context of a freshly encoded link request.
    ///
    /// A full store first evicts entries that have already outlived
    /// the TTL, so a host that never drives [`cleanup_expired`] still
    /// cannot wedge on dead entries alone.
    ///
    /// # Errors
    /// - `PendingLimitReached` if the store is at capacity with live
    ///   entries
    /// - `DuplicateRequest` if the id is already pending; the existing
    ///   context is left untouched
    ///
    /// [`cleanup_expired`]: Self::cleanup_expired
    pub fn insert(&self, request_id: RequestId, cipher_key: CipherKey) -> Result<()> {
        if !self.try_reserve_slot() {
            self.cleanup_expired();
            if !self.try_reserve_slot() {
                return Err(ClientError::PendingLimitReached {
                    limit: self.max_pending,
                });
            }
        }

        // The entry holds its shard lock, so the occupancy check and
        // the insert are one atomic step
        match self.links.entry(request_id) {
            Entry::Occupied(_) => {
                self.release_slot();
                Err(ClientError::DuplicateRequest(request_id))
            }
            Entry::Vacant(slot) => {
                slot.insert(PendingLink::new(request_id, cipher_key));
                debug!(request_id = %request_id, pending = self.len(), "Link registered");
                Ok(())
            }
        }
    }

    /// Removes and returns the context for a request id.
    ///
    /// Consumption is deliberate: a second result event for the same
    /// id finds nothing, so each context is used exactly once.
    #[must_use]
    pub fn take(&self, request_id: &RequestId) -> Option<PendingLink> {
        let link = self.links.remove(request_id).map(|(_, link)| link);
        if link.is_some() {
            self.release_slot();
        }
        link
    }

    /// Returns `true` if a request id is still awaiting its result.
    #[must_use]
    pub fn contains(&self, request_id: &RequestId) -> bool {
        self.links.contains_key(request_id)
    }

    /// Returns the number of in-flight requests.
    #[must_use]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Returns `true` if nothing is in flight.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Evicts entries older than the TTL, returning how many.
    ///
    /// Intended to be driven periodically by the host application; an
    /// expired request can no longer be completed. `insert` also runs
    /// this sweep when the store is full.
    pub fn cleanup_expired(&self) -> usize {
        let expired: Vec<RequestId> = self
            .links
            .iter()
            .filter(|entry| entry.value().is_expired(self.ttl))
            .map(|entry| *entry.key())
            .collect();

        let mut evicted = 0;
        for id in &expired {
            // remove is atomic per key; only the winner releases the slot
            if self.links.remove(id).is_some() {
                debug!(request_id = %id, "Pending link expired");
                self.release_slot();
                evicted += 1;
            }
        }

        if evicted > 0 {
            info!("Evicted {} expired pending links", evicted);
        }

        evicted
    }
}

impl std::fmt::Debug for PendingLinks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingLinks")
            .field("pending", &self.len())
            .field("max_pending", &self.max_pending)
            .field("ttl", &self.ttl)
            .finish()
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Barrier};
    use std::thread;

    fn test_key(byte: u8) -> CipherKey {
        CipherKey::from_bytes([byte; 32])
    }

    #[test]
    fn test_insert_and_take() {
        let store = PendingLinks::new(16, Duration::from_secs(60));
        let id = RequestId::from_raw(1);

        store.insert(id, test_key(0x11)).unwrap();
        assert!(store.contains(&id));
        assert_eq!(store.len(), 1);

        let link = store.take(&id).unwrap();
        assert_eq!(link.request_id, id);
        assert_eq!(link.cipher_key, test_key(0x11));
        assert!(store.is_empty());
    }

    #[test]
    fn test_take_consumes_exactly_once() {
        let store = PendingLinks::new(16, Duration::from_secs(60));
        let id = RequestId::from_raw(2);

        store.insert(id, test_key(0x22)).unwrap();
        assert!(store.take(&id).is_some());
        assert!(store.take(&id).is_none());
    }

    #[test]
    fn test_capacity_bound() {
        let store = PendingLinks::new(2, Duration::from_secs(60));
        store.insert(RequestId::from_raw(1), test_key(1)).unwrap();
        store.insert(RequestId::from_raw(2), test_key(2)).unwrap();

        let result = store.insert(RequestId::from_raw(3), test_key(3));
        assert!(matches!(
            result,
            Err(ClientError::PendingLimitReached { limit: 2 })
        ));

        // Taking one frees a slot
        assert!(store.take(&RequestId::from_raw(1)).is_some());
        assert!(store.insert(RequestId::from_raw(3), test_key(3)).is_ok());
    }

    #[test]
    fn test_capacity_bound_under_contention() {
        // Many threads racing for the last slot: exactly one insert
        // may win per round, never more
        const THREADS: u64 = 8;
        const ROUNDS: u64 = 200;

        let store = Arc::new(PendingLinks::new(1, Duration::from_secs(60)));

        for round in 0..ROUNDS {
            let barrier = Arc::new(Barrier::new(THREADS as usize));
            let handles: Vec<_> = (0..THREADS)
                .map(|i| {
                    let store = Arc::clone(&store);
                    let barrier = Arc::clone(&barrier);
                    let id = RequestId::from_raw(round * THREADS + i);
                    thread::spawn(move || {
                        barrier.wait();
                        store.insert(id, test_key(i as u8)).is_ok().then_some(id)
                    })
                })
                .collect();

            let winners: Vec<RequestId> = handles
                .into_iter()
                .filter_map(|h| h.join().unwrap())
                .collect();

            assert_eq!(winners.len(), 1, "round {round} overshot the bound");
            assert_eq!(store.len(), 1);
            assert!(store.take(&winners[0]).is_some());
            assert!(store.is_empty());
        }
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let store = PendingLinks::new(16, Duration::from_secs(60));
        let id = RequestId::from_raw(4);

        store.insert(id, test_key(0x11)).unwrap();
        let result = store.insert(id, test_key(0x99));
        assert!(matches!(result, Err(ClientError::DuplicateRequest(dup)) if dup == id));

        // The original context survives and capacity is unchanged
        assert_eq!(store.len(), 1);
        let link = store.take(&id).unwrap();
        assert_eq!(link.cipher_key, test_key(0x11));

        // The rejected attempt did not leak a slot
        store.insert(RequestId::from_raw(5), test_key(5)).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_full_store_evicts_expired_on_insert() {
        let store = PendingLinks::new(1, Duration::ZERO);
        store.insert(RequestId::from_raw(1), test_key(1)).unwrap();

        // The only slot is held by an already-expired entry; a new
        // insert reclaims it instead of failing
        std::thread::sleep(Duration::from_millis(5));
        store.insert(RequestId::from_raw(2), test_key(2)).unwrap();

        assert_eq!(store.len(), 1);
        assert!(!store.contains(&RequestId::from_raw(1)));
        assert!(store.contains(&RequestId::from_raw(2)));
    }

    #[test]
    fn test_cleanup_expired() {
        let store = PendingLinks::new(16, Duration::ZERO);
        store.insert(RequestId::from_raw(1), test_key(1)).unwrap();
        store.insert(RequestId::from_raw(2), test_key(2)).unwrap();

        // Zero TTL: everything already counts as expired
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(store.cleanup_expired(), 2);
        assert!(store.is_empty());

        // Cleanup released both slots
        store.insert(RequestId::from_raw(3), test_key(3)).unwrap();
    }

    #[test]
    fn test_cleanup_keeps_fresh_entries() {
        let store = PendingLinks::new(16, Duration::from_secs(300));
        store.insert(RequestId::from_raw(1), test_key(1)).unwrap();

        assert_eq!(store.cleanup_expired(), 0);
        assert!(store.contains(&RequestId::from_raw(1)));
    }

    #[test]
    fn test_debug_hides_key_material() {
        let store = PendingLinks::new(16, Duration::from_secs(60));
        let id = RequestId::from_raw(7);
        store.insert(id, test_key(0x55)).unwrap();

        let link = store.take(&id).unwrap();
        let debug = format!("{link:?}");
        assert!(!debug.contains("cipher_key"));
        assert!(!debug.contains("5555"));
    }
}
