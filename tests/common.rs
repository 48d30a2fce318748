// ABOUTME: Shared test utilities for integration tests
// ABOUTME: In-memory store fakes with call counters and failure switches
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FridgeChef
#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use fridgechef_recommend::cache::{factory::Cache, CacheConfig, CacheProvider};
use fridgechef_recommend::errors::{AppError, AppResult};
use fridgechef_recommend::models::{Recipe, RecipeIngredient, RecipeStep};
use fridgechef_recommend::store::{CandidateIndex, IngredientStore};

/// In-memory cache with the background sweep disabled for tests
pub async fn test_cache() -> Cache {
    let config = CacheConfig {
        redis_url: None,
        enable_background_cleanup: false,
        ..CacheConfig::default()
    };
    Cache::new(config).await.expect("in-memory cache")
}

/// Build a recipe with named ingredients and a single step
pub fn recipe(id: i64, author_id: i64, title: &str, ingredients: &[&str]) -> Recipe {
    Recipe {
        id,
        author_id,
        title: title.to_string(),
        image_url: None,
        ingredients: ingredients
            .iter()
            .map(|name| RecipeIngredient::named(*name))
            .collect(),
        steps: vec![RecipeStep {
            description: format!("Prepare {title}."),
            image_url: None,
        }],
    }
}

/// Fake ingredient store with per-user pantries, a call counter, and a
/// failure switch
pub struct FakeIngredientStore {
    pantries: Mutex<HashMap<i64, Vec<String>>>,
    pub calls: AtomicUsize,
    pub fail: AtomicBool,
    /// Artificial fetch latency in milliseconds, for observing in-flight state
    pub delay_ms: AtomicU64,
}

impl FakeIngredientStore {
    pub fn new() -> Self {
        Self {
            pantries: Mutex::new(HashMap::new()),
            calls: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
            delay_ms: AtomicU64::new(0),
        }
    }

    pub fn set_pantry(&self, user_id: i64, names: &[&str]) {
        self.pantries
            .lock()
            .unwrap()
            .insert(user_id, names.iter().map(ToString::to_string).collect());
    }
}

#[async_trait]
impl IngredientStore for FakeIngredientStore {
    async fn current_ingredient_names(&self, user_id: i64) -> AppResult<Vec<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::database("ingredient store offline").with_user_id(user_id));
        }
        Ok(self
            .pantries
            .lock()
            .unwrap()
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }
}

/// Fake candidate index over a fixed recipe set.
///
/// Counts calls per query kind and can be switched to fail the ranked query
/// or the overlap fallback independently.
pub struct FakeCandidateIndex {
    recipes: Mutex<Vec<Recipe>>,
    pub primary_calls: AtomicUsize,
    pub fallback_calls: AtomicUsize,
    pub recent_calls: AtomicUsize,
    pub fail_primary: AtomicBool,
    pub fail_fallback: AtomicBool,
}

impl FakeCandidateIndex {
    pub fn new(recipes: Vec<Recipe>) -> Self {
        Self {
            recipes: Mutex::new(recipes),
            primary_calls: AtomicUsize::new(0),
            fallback_calls: AtomicUsize::new(0),
            recent_calls: AtomicUsize::new(0),
            fail_primary: AtomicBool::new(false),
            fail_fallback: AtomicBool::new(false),
        }
    }

    fn overlap_count(recipe: &Recipe, pantry: &HashSet<&str>) -> usize {
        recipe
            .ingredients
            .iter()
            .filter(|i| pantry.contains(i.food_name.as_str()))
            .count()
    }
}

#[async_trait]
impl CandidateIndex for FakeCandidateIndex {
    async fn top_matching_by_overlap(
        &self,
        ingredient_names: &[String],
        exclude_user_id: i64,
        limit: u32,
    ) -> AppResult<Vec<Recipe>> {
        self.primary_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_primary.load(Ordering::SeqCst) {
            return Err(AppError::database("ranked query unavailable"));
        }
        let pantry: HashSet<&str> = ingredient_names.iter().map(String::as_str).collect();
        let mut matched: Vec<(usize, Recipe)> = self
            .recipes
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.author_id != exclude_user_id)
            .map(|r| (Self::overlap_count(r, &pantry), r.clone()))
            .filter(|(count, _)| *count > 0)
            .collect();
        matched.sort_by(|a, b| b.0.cmp(&a.0));
        matched.truncate(limit as usize);
        Ok(matched.into_iter().map(|(_, r)| r).collect())
    }

    async fn any_overlap(
        &self,
        ingredient_names: &[String],
        exclude_user_id: i64,
        limit: u32,
    ) -> AppResult<Vec<Recipe>> {
        self.fallback_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_fallback.load(Ordering::SeqCst) {
            return Err(AppError::database("overlap query unavailable"));
        }
        let pantry: HashSet<&str> = ingredient_names.iter().map(String::as_str).collect();
        let mut matched: Vec<Recipe> = self
            .recipes
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.author_id != exclude_user_id)
            .filter(|r| Self::overlap_count(r, &pantry) > 0)
            .cloned()
            .collect();
        matched.truncate(limit as usize);
        Ok(matched)
    }

    async fn by_ids(&self, ids: &[i64]) -> AppResult<Vec<Recipe>> {
        let wanted: HashSet<i64> = ids.iter().copied().collect();
        Ok(self
            .recipes
            .lock()
            .unwrap()
            .iter()
            .filter(|r| wanted.contains(&r.id))
            .cloned()
            .collect())
    }

    async fn recent_excluding(&self, user_id: i64, limit: u32) -> AppResult<Vec<Recipe>> {
        self.recent_calls.fetch_add(1, Ordering::SeqCst);
        // Most recently added first.
        let mut recent: Vec<Recipe> = self
            .recipes
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|r| r.author_id != user_id)
            .cloned()
            .collect();
        recent.truncate(limit as usize);
        Ok(recent)
    }
}
