// ABOUTME: Cache backend selection based on configuration
// ABOUTME: Unified handle delegating to the in-memory or Redis implementation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FridgeChef

use super::{memory::InMemoryCache, redis::RedisCache, CacheConfig, CacheKey, CacheProvider};
use crate::errors::AppResult;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Unified cache handle over the configured backend.
///
/// Presence of `redis_url` in the configuration selects Redis; otherwise
/// the in-memory backend is used.
#[derive(Clone)]
pub enum Cache {
    /// In-memory backend (tests, single-node deployments)
    Memory(InMemoryCache),
    /// Redis backend (multi-instance deployments)
    Redis(RedisCache),
}

impl Cache {
    /// Create a cache from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if backend initialization fails
    pub async fn from_env() -> AppResult<Self> {
        <Self as CacheProvider>::new(CacheConfig::from_env()).await
    }
}

#[async_trait::async_trait]
impl CacheProvider for Cache {
    async fn new(config: CacheConfig) -> AppResult<Self> {
        if config.redis_url.is_some() {
            tracing::info!("Initializing Redis recommendation cache");
            Ok(Self::Redis(RedisCache::new(config).await?))
        } else {
            tracing::info!(
                "Initializing in-memory recommendation cache (max entries: {})",
                config.max_entries
            );
            Ok(Self::Memory(InMemoryCache::new(config).await?))
        }
    }

    async fn set<T: Serialize + Send + Sync>(
        &self,
        key: &CacheKey,
        value: &T,
        ttl: Duration,
    ) -> AppResult<()> {
        match self {
            Self::Memory(inner) => inner.set(key, value, ttl).await,
            Self::Redis(inner) => inner.set(key, value, ttl).await,
        }
    }

    async fn get<T: for<'de> Deserialize<'de>>(&self, key: &CacheKey) -> AppResult<Option<T>> {
        match self {
            Self::Memory(inner) => inner.get(key).await,
            Self::Redis(inner) => inner.get(key).await,
        }
    }

    async fn touch(&self, key: &CacheKey, ttl: Duration) -> AppResult<bool> {
        match self {
            Self::Memory(inner) => inner.touch(key, ttl).await,
            Self::Redis(inner) => inner.touch(key, ttl).await,
        }
    }

    async fn invalidate(&self, key: &CacheKey) -> AppResult<()> {
        match self {
            Self::Memory(inner) => inner.invalidate(key).await,
            Self::Redis(inner) => inner.invalidate(key).await,
        }
    }

    async fn exists(&self, key: &CacheKey) -> AppResult<bool> {
        match self {
            Self::Memory(inner) => inner.exists(key).await,
            Self::Redis(inner) => inner.exists(key).await,
        }
    }

    async fn ttl(&self, key: &CacheKey) -> AppResult<Option<Duration>> {
        match self {
            Self::Memory(inner) => inner.ttl(key).await,
            Self::Redis(inner) => inner.ttl(key).await,
        }
    }

    async fn health_check(&self) -> AppResult<()> {
        match self {
            Self::Memory(inner) => inner.health_check().await,
            Self::Redis(inner) => inner.health_check().await,
        }
    }

    async fn clear_all(&self) -> AppResult<()> {
        match self {
            Self::Memory(inner) => inner.clear_all().await,
            Self::Redis(inner) => inner.clear_all().await,
        }
    }
}
