// ABOUTME: Recommendation cache abstraction with pluggable backends
// ABOUTME: Cache keys, TTL configuration, and the provider trait shared by memory and Redis
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FridgeChef

/// Backend selection and unified handle
pub mod factory;
/// In-memory cache implementation
pub mod memory;
/// Redis cache implementation
pub mod redis;

use crate::config::RedisConnectionConfig;
use crate::constants::cache::{
    DEFAULT_CACHE_MAX_ENTRIES, DEFAULT_CLEANUP_INTERVAL_SECS, TTL_PROCESSING_MARKER_SECS,
    TTL_RECOMMENDATIONS_SECS,
};
use crate::errors::AppResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Cache provider trait for pluggable backend implementations.
///
/// Two kinds of entries live behind this trait: a user's ranked
/// recommendation list, and the short-lived marker saying a recomputation
/// for that user is in flight. The Reader extends a list's TTL on every hit
/// via [`CacheProvider::touch`]; the Orchestrator is the only writer of list
/// content.
#[async_trait::async_trait]
pub trait CacheProvider: Send + Sync + Clone {
    /// Create a new cache instance with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if backend initialization fails
    async fn new(config: CacheConfig) -> AppResult<Self>
    where
        Self: Sized;

    /// Store a value with a TTL, replacing any prior value
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or storage fails
    async fn set<T: Serialize + Send + Sync>(
        &self,
        key: &CacheKey,
        value: &T,
        ttl: Duration,
    ) -> AppResult<()>;

    /// Retrieve a value, `None` on miss or expiry
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails or the stored bytes do not
    /// deserialize; callers on the read path treat that as a miss and evict
    async fn get<T: for<'de> Deserialize<'de>>(&self, key: &CacheKey) -> AppResult<Option<T>>;

    /// Reset an entry's remaining TTL to the given full duration.
    ///
    /// Returns `false` if the key does not exist. This is the sliding-window
    /// extension: actively viewed users keep their cache warm longer.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails
    async fn touch(&self, key: &CacheKey, ttl: Duration) -> AppResult<bool>;

    /// Remove a single entry
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails
    async fn invalidate(&self, key: &CacheKey) -> AppResult<()>;

    /// Whether a live (unexpired) entry exists for the key
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails
    async fn exists(&self, key: &CacheKey) -> AppResult<bool>;

    /// Remaining TTL for a key, `None` if absent or expired
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails
    async fn ttl(&self, key: &CacheKey) -> AppResult<Option<Duration>>;

    /// Verify the backend is reachable and healthy
    ///
    /// # Errors
    ///
    /// Returns an error if the health check fails
    async fn health_check(&self) -> AppResult<()>;

    /// Clear every entry owned by this engine (testing/admin)
    ///
    /// # Errors
    ///
    /// Returns an error if the clear operation fails
    async fn clear_all(&self) -> AppResult<()>;
}

/// Cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries (in-memory backend)
    pub max_entries: usize,
    /// Redis connection URL; presence selects the Redis backend
    pub redis_url: Option<String>,
    /// Interval between expired-entry sweeps (in-memory backend)
    pub cleanup_interval: Duration,
    /// Run the background sweep task (disable in tests to avoid runtime churn)
    pub enable_background_cleanup: bool,
    /// Redis connection and retry configuration
    pub redis_connection: RedisConnectionConfig,
    /// TTL configuration
    pub ttl: CacheTtlConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_CACHE_MAX_ENTRIES,
            redis_url: None,
            cleanup_interval: Duration::from_secs(DEFAULT_CLEANUP_INTERVAL_SECS),
            enable_background_cleanup: true,
            redis_connection: RedisConnectionConfig::default(),
            ttl: CacheTtlConfig::default(),
        }
    }
}

impl CacheConfig {
    /// Load cache configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            max_entries: std::env::var("CACHE_MAX_ENTRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_CACHE_MAX_ENTRIES),
            redis_url: std::env::var("REDIS_URL").ok(),
            cleanup_interval: std::env::var("CACHE_CLEANUP_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map_or(
                    Duration::from_secs(DEFAULT_CLEANUP_INTERVAL_SECS),
                    Duration::from_secs,
                ),
            enable_background_cleanup: true,
            redis_connection: RedisConnectionConfig::from_env(),
            ttl: CacheTtlConfig::from_env(),
        }
    }
}

/// TTLs for the two entry kinds
#[derive(Debug, Clone)]
pub struct CacheTtlConfig {
    /// Recommendation list TTL in seconds (default 6 hours)
    pub recommendations_secs: u64,
    /// Computation marker TTL in seconds (default 5 minutes)
    pub processing_marker_secs: u64,
}

impl Default for CacheTtlConfig {
    fn default() -> Self {
        Self {
            recommendations_secs: TTL_RECOMMENDATIONS_SECS,
            processing_marker_secs: TTL_PROCESSING_MARKER_SECS,
        }
    }
}

impl CacheTtlConfig {
    /// Load TTL configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            recommendations_secs: std::env::var("CACHE_TTL_RECOMMENDATIONS_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(TTL_RECOMMENDATIONS_SECS),
            processing_marker_secs: std::env::var("CACHE_TTL_PROCESSING_MARKER_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(TTL_PROCESSING_MARKER_SECS),
        }
    }

    /// Full recommendation list TTL as a `Duration`
    #[must_use]
    pub const fn recommendations(&self) -> Duration {
        Duration::from_secs(self.recommendations_secs)
    }

    /// Computation marker TTL as a `Duration`
    #[must_use]
    pub const fn processing_marker(&self) -> Duration {
        Duration::from_secs(self.processing_marker_secs)
    }
}

/// Keys for the per-user entries owned by this engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// The user's ranked recommendation list
    Recommendations {
        /// User the list was computed for
        user_id: i64,
    },
    /// Marker saying a recomputation for the user is in flight
    ProcessingMarker {
        /// User being recomputed
        user_id: i64,
    },
}

impl CacheKey {
    /// Key for a user's recommendation list
    #[must_use]
    pub const fn recommendations(user_id: i64) -> Self {
        Self::Recommendations { user_id }
    }

    /// Key for a user's in-flight computation marker
    #[must_use]
    pub const fn processing_marker(user_id: i64) -> Self {
        Self::ProcessingMarker { user_id }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recommendations { user_id } => write!(f, "recommendations:user:{user_id}"),
            Self::ProcessingMarker { user_id } => write!(f, "processing:user:{user_id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_display_is_namespaced_per_kind() {
        let list = CacheKey::recommendations(42);
        let marker = CacheKey::processing_marker(42);
        assert_eq!(list.to_string(), "recommendations:user:42");
        assert_eq!(marker.to_string(), "processing:user:42");
        assert_ne!(list.to_string(), marker.to_string());
    }

    #[test]
    fn test_ttl_defaults() {
        let ttl = CacheTtlConfig::default();
        assert_eq!(ttl.recommendations(), Duration::from_secs(21_600));
        assert_eq!(ttl.processing_marker(), Duration::from_secs(300));
    }
}
