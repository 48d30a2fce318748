// ABOUTME: The recommendation computation pipeline
// ABOUTME: Pantry fetch, two-tier candidate query, matching, ranking, enrichment, cache write
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FridgeChef

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cache::{CacheKey, CacheProvider, CacheTtlConfig};
use crate::constants::recommendation::{
    FALLBACK_CANDIDATE_LIMIT, MAX_RECOMMENDATIONS, PRIMARY_CANDIDATE_LIMIT,
};
use crate::errors::AppResult;
use crate::matching;
use crate::models::{EnrichedRecommendation, MatchAnalysis, Recipe};
use crate::notifications::CompletionNotifier;
use crate::store::{CandidateIndex, IngredientStore};

/// Runs one full recommendation computation for a user and owns the cache
/// write.
///
/// The orchestrator is the only writer of recommendation list content; the
/// Reader only reads, touches, and evicts. Each run is a full overwrite, so
/// recomputation is idempotent and the benign double-compute race resolves
/// to last-write-wins.
pub struct RecommendationOrchestrator<C: CacheProvider> {
    ingredients: Arc<dyn IngredientStore>,
    candidates: Arc<dyn CandidateIndex>,
    cache: C,
    ttl: CacheTtlConfig,
    notifier: CompletionNotifier,
}

impl<C: CacheProvider> RecommendationOrchestrator<C> {
    /// Assemble an orchestrator over its collaborators
    pub fn new(
        ingredients: Arc<dyn IngredientStore>,
        candidates: Arc<dyn CandidateIndex>,
        cache: C,
        ttl: CacheTtlConfig,
        notifier: CompletionNotifier,
    ) -> Self {
        Self {
            ingredients,
            candidates,
            cache,
            ttl,
            notifier,
        }
    }

    /// Recompute and cache the user's ranked recommendation list.
    ///
    /// Returns the freshly computed list; the cache is the delivery
    /// mechanism for readers, so callers normally ignore it. Always deletes
    /// the user's processing marker before returning, on every exit path. A
    /// crashed process leaves the marker to lapse on its own short TTL.
    ///
    /// # Errors
    ///
    /// Returns an error if the pantry fetch or the enrichment lookup fails.
    /// Candidate-query failures degrade inside the pipeline instead.
    pub async fn recompute(&self, user_id: i64) -> AppResult<Vec<EnrichedRecommendation>> {
        let result = self.compute_and_store(user_id).await;

        let marker = CacheKey::processing_marker(user_id);
        if let Err(e) = self.cache.invalidate(&marker).await {
            warn!(user_id, error = %e, "failed to clear processing marker");
        }

        result
    }

    async fn compute_and_store(&self, user_id: i64) -> AppResult<Vec<EnrichedRecommendation>> {
        let pantry = self.ingredients.current_ingredient_names(user_id).await?;
        if pantry.is_empty() {
            info!(user_id, "no registered ingredients, skipping recommendation computation");
            return Ok(Vec::new());
        }

        debug!(
            user_id,
            pantry_size = pantry.len(),
            "starting recommendation computation"
        );

        let candidates = self.fetch_candidates(&pantry, user_id).await;
        let pantry_set: HashSet<String> = pantry.into_iter().collect();

        // Score every candidate, keep those above threshold, rank, cap.
        let mut scored: Vec<(MatchAnalysis, i64)> = candidates
            .iter()
            .filter_map(|recipe| {
                let analysis = matching::analyze(&recipe.ingredient_names(), &pantry_set);
                matching::meets_threshold(analysis.matching_rate).then_some((analysis, recipe.id))
            })
            .collect();
        scored.sort_by(|a, b| b.0.matching_rate.total_cmp(&a.0.matching_rate));
        scored.truncate(MAX_RECOMMENDATIONS);

        let recommendations = self.enrich(scored).await?;

        // An empty outcome is cached too: "computed and found nothing" must
        // not look like "never computed" to the read path, or every read
        // would re-set the marker and re-enqueue the same computation.
        let key = CacheKey::recommendations(user_id);
        if let Err(e) = self
            .cache
            .set(&key, &recommendations, self.ttl.recommendations())
            .await
        {
            // A failed write means the next read misses and retriggers.
            warn!(user_id, error = %e, "failed to cache recommendations");
        } else {
            info!(
                user_id,
                count = recommendations.len(),
                "cached fresh recommendations"
            );
        }

        if recommendations.is_empty() {
            self.notifier.notify_no_matches(user_id);
        } else {
            self.notifier.notify_ready(user_id, recommendations.len());
        }

        Ok(recommendations)
    }

    /// Two-tier candidate fetch.
    ///
    /// The ranked query leans on storage-level JSON machinery and may fail;
    /// the broader any-overlap query is the fallback. Both failing yields an
    /// empty candidate set, not an error.
    async fn fetch_candidates(&self, pantry: &[String], user_id: i64) -> Vec<Recipe> {
        match self
            .candidates
            .top_matching_by_overlap(pantry, user_id, PRIMARY_CANDIDATE_LIMIT)
            .await
        {
            Ok(recipes) => recipes,
            Err(e) => {
                warn!(user_id, error = %e, "ranked candidate query failed, trying overlap fallback");
                match self
                    .candidates
                    .any_overlap(pantry, user_id, FALLBACK_CANDIDATE_LIMIT)
                    .await
                {
                    Ok(recipes) => recipes,
                    Err(e) => {
                        warn!(user_id, error = %e, "overlap fallback failed, no candidates this round");
                        Vec::new()
                    }
                }
            }
        }
    }

    /// Attach full recipe detail to the ranked survivors.
    ///
    /// Recipes that vanished between ranking and lookup are dropped; rank
    /// order is preserved.
    async fn enrich(
        &self,
        scored: Vec<(MatchAnalysis, i64)>,
    ) -> AppResult<Vec<EnrichedRecommendation>> {
        if scored.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = scored.iter().map(|(_, id)| *id).collect();
        let mut details: HashMap<i64, Recipe> = self
            .candidates
            .by_ids(&ids)
            .await?
            .into_iter()
            .map(|recipe| (recipe.id, recipe))
            .collect();

        Ok(scored
            .into_iter()
            .filter_map(|(analysis, id)| {
                details
                    .remove(&id)
                    .map(|recipe| EnrichedRecommendation::new(analysis, recipe))
            })
            .collect())
    }
}
