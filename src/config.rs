// ABOUTME: Environment-driven configuration for the recommendation engine
// ABOUTME: Database, cache backend, Redis connection, and worker pool settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FridgeChef

use crate::constants::{redis, workers};
use serde::{Deserialize, Serialize};
use std::env;

/// Top-level engine configuration
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Database connection settings
    pub database: DatabaseConfig,
    /// Cache backend settings
    pub cache: crate::cache::CacheConfig,
    /// Worker pool sizing
    pub workers: WorkerPoolConfig,
}

impl EngineConfig {
    /// Load the full engine configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            database: DatabaseConfig::from_env(),
            cache: crate::cache::CacheConfig::from_env(),
            workers: WorkerPoolConfig::from_env(),
        }
    }
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DatabaseConfig {
    /// MySQL connection URL for the recipe and ingredient stores
    pub database_url: Option<String>,
}

impl DatabaseConfig {
    /// Load database configuration from environment
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").ok(),
        }
    }
}

/// Redis connection and retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConnectionConfig {
    /// Connection timeout in seconds
    pub connection_timeout_secs: u64,
    /// Response/command timeout in seconds
    pub response_timeout_secs: u64,
    /// Number of reconnection retries after a connection drop
    pub reconnection_retries: usize,
    /// Exponential backoff base for retry delays
    pub retry_exponent_base: u64,
    /// Maximum retry delay in milliseconds
    pub max_retry_delay_ms: u64,
    /// Number of retries for the initial connection at startup
    pub initial_connection_retries: u32,
    /// Initial retry delay in milliseconds (doubles with exponential backoff)
    pub initial_retry_delay_ms: u64,
}

impl Default for RedisConnectionConfig {
    fn default() -> Self {
        Self {
            connection_timeout_secs: redis::CONNECTION_TIMEOUT_SECS,
            response_timeout_secs: redis::RESPONSE_TIMEOUT_SECS,
            reconnection_retries: redis::RECONNECTION_RETRIES,
            retry_exponent_base: redis::RETRY_EXPONENT_BASE,
            max_retry_delay_ms: redis::MAX_RETRY_DELAY_MS,
            initial_connection_retries: redis::INITIAL_CONNECTION_RETRIES,
            initial_retry_delay_ms: redis::INITIAL_RETRY_DELAY_MS,
        }
    }
}

impl RedisConnectionConfig {
    /// Load Redis connection configuration from environment
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            connection_timeout_secs: env::var("REDIS_CONNECTION_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(redis::CONNECTION_TIMEOUT_SECS),
            response_timeout_secs: env::var("REDIS_RESPONSE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(redis::RESPONSE_TIMEOUT_SECS),
            reconnection_retries: env::var("REDIS_RECONNECTION_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(redis::RECONNECTION_RETRIES),
            retry_exponent_base: env::var("REDIS_RETRY_EXPONENT_BASE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(redis::RETRY_EXPONENT_BASE),
            max_retry_delay_ms: env::var("REDIS_MAX_RETRY_DELAY_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(redis::MAX_RETRY_DELAY_MS),
            initial_connection_retries: env::var("REDIS_INITIAL_CONNECTION_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(redis::INITIAL_CONNECTION_RETRIES),
            initial_retry_delay_ms: env::var("REDIS_INITIAL_RETRY_DELAY_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(redis::INITIAL_RETRY_DELAY_MS),
        }
    }
}

/// Worker pool sizing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerPoolConfig {
    /// Concurrent recomputations allowed in the recommendation pool
    pub recommendation_workers: usize,
    /// Queued recompute jobs before new requests are dropped
    pub recommendation_queue_capacity: usize,
    /// Workers in the lightweight notification pool
    pub notification_workers: usize,
    /// Queued notifications before new ones are dropped
    pub notification_queue_capacity: usize,
}

impl Default for WorkerPoolConfig {
    fn default() -> Self {
        Self {
            recommendation_workers: workers::RECOMMENDATION_WORKERS,
            recommendation_queue_capacity: workers::RECOMMENDATION_QUEUE_CAPACITY,
            notification_workers: workers::NOTIFICATION_WORKERS,
            notification_queue_capacity: workers::NOTIFICATION_QUEUE_CAPACITY,
        }
    }
}

impl WorkerPoolConfig {
    /// Load worker pool configuration from environment
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            recommendation_workers: env::var("RECOMMENDATION_WORKERS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(workers::RECOMMENDATION_WORKERS),
            recommendation_queue_capacity: env::var("RECOMMENDATION_QUEUE_CAPACITY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(workers::RECOMMENDATION_QUEUE_CAPACITY),
            notification_workers: env::var("NOTIFICATION_WORKERS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(workers::NOTIFICATION_WORKERS),
            notification_queue_capacity: env::var("NOTIFICATION_QUEUE_CAPACITY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(workers::NOTIFICATION_QUEUE_CAPACITY),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_pool_defaults() {
        let config = WorkerPoolConfig::default();
        assert_eq!(config.recommendation_workers, 3);
        assert_eq!(config.recommendation_queue_capacity, 50);
        assert_eq!(config.notification_workers, 2);
    }

    #[test]
    fn test_redis_connection_defaults() {
        let config = RedisConnectionConfig::default();
        assert_eq!(config.connection_timeout_secs, 5);
        assert_eq!(config.initial_connection_retries, 3);
    }
}
