// ============================================
// File: crates/veilink-client/src/config.rs
// ============================================
//! # Client Configuration
//!
//! ## Creation Reason
//! Gathers the knobs the host application sets once at startup: the
//! cluster's public key (from its network-metadata lookup) and the
//! bounds of the pending-link store.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use veilink_core::crypto::keys::ClusterPublicKey;

use crate::error::{ClientError, Result};

/// Client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// The computation cluster's X25519 public key.
    pub cluster_key: ClusterPublicKey,

    /// Maximum number of link requests awaiting results.
    #[serde(default = "default_max_pending")]
    pub max_pending: usize,

    /// Seconds before an unanswered link request expires.
    ///
    /// Expired entries are evicted by `LinkService::cleanup_expired`,
    /// which the host should drive periodically; a full store also
    /// sweeps them on insert, so expired entries alone never pin the
    /// store at `max_pending`.
    #[serde(default = "default_link_ttl")]
    pub link_ttl_secs: u64,
}

fn default_max_pending() -> usize {
    1024
}

fn default_link_ttl() -> u64 {
    300
}

impl ClientConfig {
    /// Creates a configuration with default bounds.
    #[must_use]
    pub fn new(cluster_key: ClusterPublicKey) -> Self {
        Self {
            cluster_key,
            max_pending: default_max_pending(),
            link_ttl_secs: default_link_ttl(),
        }
    }

    /// Returns the link TTL as a [`Duration`].
    #[must_use]
    pub const fn link_ttl(&self) -> Duration {
        Duration::from_secs(self.link_ttl_secs)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// Returns `ConfigInvalid` for zero bounds.
    pub fn validate(&self) -> Result<()> {
        if self.max_pending == 0 {
            return Err(ClientError::config_invalid("max_pending", "must be > 0"));
        }
        if self.link_ttl_secs == 0 {
            return Err(ClientError::config_invalid("link_ttl_secs", "must be > 0"));
        }
        Ok(())
    }
}

// ============================================
// Tests
// ============================================
