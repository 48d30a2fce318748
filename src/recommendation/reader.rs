// ABOUTME: Non-blocking read path for cached recommendations
// ABOUTME: Layered fallbacks: cached list, updating empty list, popular recipes feed
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FridgeChef

use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::{CacheKey, CacheProvider, CacheTtlConfig};
use crate::constants::recommendation::FALLBACK_FEED_SIZE;
use crate::errors::AppResult;
use crate::models::EnrichedRecommendation;
use crate::recommendation::worker::{RecomputeHandle, RecomputeTrigger};
use crate::store::CandidateIndex;

/// Serves recommendation lists without ever blocking on computation.
///
/// Every call returns a usable list immediately: the cached ranked list on a
/// hit, an empty "updating" list while a recompute is already in flight, or
/// a popular-recipes feed for a cold user. Errors degrade; nothing on this
/// path propagates to the caller.
pub struct RecommendationReader<C: CacheProvider> {
    cache: C,
    candidates: Arc<dyn CandidateIndex>,
    recompute: RecomputeHandle,
    ttl: CacheTtlConfig,
}

impl<C: CacheProvider> RecommendationReader<C> {
    /// Assemble a reader over its collaborators
    pub fn new(
        cache: C,
        candidates: Arc<dyn CandidateIndex>,
        recompute: RecomputeHandle,
        ttl: CacheTtlConfig,
    ) -> Self {
        Self {
            cache,
            candidates,
            recompute,
            ttl,
        }
    }

    /// The user's recommendations, served from cache with fallbacks.
    ///
    /// A hit extends the entry's TTL back to the full window, so actively
    /// viewed lists stay warm. A miss sets the processing marker and
    /// enqueues a recompute unless one is already in flight.
    pub async fn get_recommendations(&self, user_id: i64) -> Vec<EnrichedRecommendation> {
        let list_key = CacheKey::recommendations(user_id);

        match self
            .cache
            .get::<Vec<EnrichedRecommendation>>(&list_key)
            .await
        {
            Ok(Some(list)) => {
                if let Err(e) = self.cache.touch(&list_key, self.ttl.recommendations()).await {
                    warn!(user_id, error = %e, "failed to extend recommendation TTL");
                }
                debug!(user_id, count = list.len(), "serving cached recommendations");
                return list;
            }
            Ok(None) => {}
            Err(e) => {
                // Unreadable entries are evicted so the next pass starts
                // clean; the marker is left alone so an in-flight recompute
                // still suppresses a duplicate trigger.
                warn!(user_id, error = %e, "cache read failed, evicting and treating as miss");
                if let Err(e) = self.cache.invalidate(&list_key).await {
                    warn!(user_id, error = %e, "failed to evict unreadable cache entry");
                }
            }
        }

        let marker_key = CacheKey::processing_marker(user_id);
        let already_in_flight = match self.cache.exists(&marker_key).await {
            Ok(exists) => exists,
            Err(e) => {
                warn!(user_id, error = %e, "marker check failed, assuming no computation in flight");
                false
            }
        };

        if already_in_flight {
            debug!(user_id, "recompute already in flight, serving updating response");
            return Vec::new();
        }

        if let Err(e) = self
            .cache
            .set(&marker_key, &true, self.ttl.processing_marker())
            .await
        {
            warn!(user_id, error = %e, "failed to set processing marker");
        }
        if !self.recompute.request(user_id, RecomputeTrigger::CacheMiss) {
            // The job was dropped; clear the marker so the next miss retries
            // right away instead of waiting out the marker TTL.
            if let Err(e) = self.cache.invalidate(&marker_key).await {
                warn!(user_id, error = %e, "failed to clear marker after dropped recompute");
            }
        }

        self.popular_fallback(user_id).await
    }

    /// Remove the user's cached list and marker.
    ///
    /// For callers that mutate recipes or ingredients out of band and need
    /// the next read to recompute.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache backend fails
    pub async fn invalidate_user(&self, user_id: i64) -> AppResult<()> {
        self.cache
            .invalidate(&CacheKey::recommendations(user_id))
            .await?;
        self.cache
            .invalidate(&CacheKey::processing_marker(user_id))
            .await?;
        debug!(user_id, "cleared cached recommendations and marker");
        Ok(())
    }

    /// Recent recipes from other users, wrapped with zero match statistics.
    ///
    /// Keeps a first-time visitor's feed from being empty while their first
    /// computation runs.
    async fn popular_fallback(&self, user_id: i64) -> Vec<EnrichedRecommendation> {
        match self
            .candidates
            .recent_excluding(user_id, FALLBACK_FEED_SIZE)
            .await
        {
            Ok(recipes) => {
                debug!(user_id, count = recipes.len(), "serving popular-recipes fallback");
                recipes
                    .into_iter()
                    .map(EnrichedRecommendation::fallback)
                    .collect()
            }
            Err(e) => {
                warn!(user_id, error = %e, "popular-recipes fallback failed, serving empty list");
                Vec::new()
            }
        }
    }
}
