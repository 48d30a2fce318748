// ABOUTME: Policy constants and backend tunables for the recommendation engine
// ABOUTME: Matching thresholds, cache TTLs, Redis retry settings, worker pool sizes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FridgeChef

//! Centralized constants. Policy values (threshold, result cap) are fixed by
//! design and deliberately not exposed through configuration.

/// Recommendation policy constants
pub mod recommendation {
    /// Minimum matching rate (percent, inclusive) for a recipe to qualify
    pub const MIN_MATCHING_RATE: f64 = 30.0;

    /// Maximum entries in a cached recommendation list
    pub const MAX_RECOMMENDATIONS: usize = 10;

    /// Candidate cap for the ranked primary index query
    pub const PRIMARY_CANDIDATE_LIMIT: u32 = 50;

    /// Candidate cap for the unranked any-overlap fallback query
    pub const FALLBACK_CANDIDATE_LIMIT: u32 = 100;

    /// Size of the popular-recipes fallback feed
    pub const FALLBACK_FEED_SIZE: u32 = 10;
}

/// Cache protocol constants
pub mod cache {
    /// TTL for a user's cached recommendation list (6 hours)
    pub const TTL_RECOMMENDATIONS_SECS: u64 = 21_600;

    /// TTL for the in-flight computation marker (5 minutes)
    ///
    /// Safety net against a crashed worker leaving the marker stuck.
    pub const TTL_PROCESSING_MARKER_SECS: u64 = 300;

    /// Namespace prefix for all engine keys in a shared backend
    pub const CACHE_KEY_PREFIX: &str = "fridgechef:recommend:";

    /// Default capacity of the in-memory backend
    pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 10_000;

    /// Default interval between expired-entry sweeps (in-memory backend)
    pub const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 300;
}

/// Redis connection and retry tunables
pub mod redis {
    /// Connection timeout in seconds
    pub const CONNECTION_TIMEOUT_SECS: u64 = 5;

    /// Response/command timeout in seconds
    pub const RESPONSE_TIMEOUT_SECS: u64 = 3;

    /// Reconnection retries after a dropped connection
    pub const RECONNECTION_RETRIES: usize = 6;

    /// Exponential backoff base for retry delays
    pub const RETRY_EXPONENT_BASE: u64 = 2;

    /// Maximum retry delay in milliseconds
    pub const MAX_RETRY_DELAY_MS: u64 = 10_000;

    /// Retries for the initial connection at startup
    pub const INITIAL_CONNECTION_RETRIES: u32 = 3;

    /// Initial retry delay in milliseconds
    pub const INITIAL_RETRY_DELAY_MS: u64 = 500;
}

/// Worker pool sizing
pub mod workers {
    /// Concurrent recomputations allowed in the recommendation pool
    pub const RECOMMENDATION_WORKERS: usize = 3;

    /// Queued recompute jobs before new requests are dropped
    pub const RECOMMENDATION_QUEUE_CAPACITY: usize = 50;

    /// Workers in the lightweight notification pool
    ///
    /// Sized separately so a burst of recommendation work cannot starve
    /// notification delivery, and vice versa.
    pub const NOTIFICATION_WORKERS: usize = 2;

    /// Queued notifications before new ones are dropped
    pub const NOTIFICATION_QUEUE_CAPACITY: usize = 100;
}
