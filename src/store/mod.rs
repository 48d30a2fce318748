// ABOUTME: Interfaces to the durable ingredient and recipe stores
// ABOUTME: Candidate index contracts consumed by the orchestrator and reader
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FridgeChef

/// MySQL implementations of the store interfaces
#[cfg(feature = "mysql")]
pub mod mysql;

use crate::errors::AppResult;
use crate::models::Recipe;

/// Durable record of which foods each user currently holds.
///
/// Read-only from this subsystem's point of view; registration and deletion
/// happen elsewhere and signal completion through
/// [`crate::models::IngredientRegisteredEvent`].
#[async_trait::async_trait]
pub trait IngredientStore: Send + Sync {
    /// Current ingredient names for a user: distinct, most recent first
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable or the query fails
    async fn current_ingredient_names(&self, user_id: i64) -> AppResult<Vec<String>>;
}

/// Durable recipe index supporting overlap queries.
///
/// The ranked query may fail or degrade (it leans on storage-level JSON
/// machinery); callers fall back to [`CandidateIndex::any_overlap`] and,
/// failing that, to an empty candidate set.
#[async_trait::async_trait]
pub trait CandidateIndex: Send + Sync {
    /// Top recipes ranked by raw ingredient-overlap count, computed at the
    /// storage layer, excluding the given user's own recipes
    ///
    /// # Errors
    ///
    /// Returns an error if the ranked query cannot be executed
    async fn top_matching_by_overlap(
        &self,
        ingredient_names: &[String],
        exclude_user_id: i64,
        limit: u32,
    ) -> AppResult<Vec<Recipe>>;

    /// Recipes sharing at least one ingredient, loosely ordered by recency;
    /// the fallback when the ranked query fails
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    async fn any_overlap(
        &self,
        ingredient_names: &[String],
        exclude_user_id: i64,
        limit: u32,
    ) -> AppResult<Vec<Recipe>>;

    /// Full recipe detail (ingredients and steps) for a batch of ids
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails
    async fn by_ids(&self, ids: &[i64]) -> AppResult<Vec<Recipe>>;

    /// Most recent recipes excluding the given user's own, with full
    /// detail; feeds the popular-recipes fallback
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    async fn recent_excluding(&self, user_id: i64, limit: u32) -> AppResult<Vec<Recipe>>;
}
