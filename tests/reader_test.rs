// ABOUTME: Tests for the non-blocking read path
// ABOUTME: TTL refresh on hit, fallback layering, marker handling, corrupt-entry recovery
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FridgeChef
#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use common::{recipe, test_cache, FakeCandidateIndex, FakeIngredientStore};
use fridgechef_recommend::cache::{factory::Cache, CacheKey, CacheProvider, CacheTtlConfig};
use fridgechef_recommend::config::WorkerPoolConfig;
use fridgechef_recommend::models::EnrichedRecommendation;
use fridgechef_recommend::notifications::CompletionNotifier;
use fridgechef_recommend::recommendation::{
    RecommendationOrchestrator, RecommendationReader, RecommendationWorkerPool,
};
use fridgechef_recommend::store::{CandidateIndex, IngredientStore};

struct Stack {
    reader: RecommendationReader<Cache>,
    cache: Cache,
    store: Arc<FakeIngredientStore>,
    index: Arc<FakeCandidateIndex>,
}

async fn build_stack(ttl: CacheTtlConfig) -> Stack {
    build_stack_with_pool(ttl, WorkerPoolConfig::default()).await
}

async fn build_stack_with_pool(ttl: CacheTtlConfig, pool: WorkerPoolConfig) -> Stack {
    let store = Arc::new(FakeIngredientStore::new());
    let index = Arc::new(FakeCandidateIndex::new(vec![
        recipe(10, 99, "Omelette", &["egg", "butter"]),
        // Shares one of four ingredients: a popular-feed candidate, but
        // below the matching threshold.
        recipe(11, 98, "Pancakes", &["egg", "flour", "milk", "sugar"]),
    ]));
    let cache = test_cache().await;

    let orchestrator = Arc::new(RecommendationOrchestrator::new(
        store.clone() as Arc<dyn IngredientStore>,
        index.clone() as Arc<dyn CandidateIndex>,
        cache.clone(),
        ttl.clone(),
        CompletionNotifier::spawn(&WorkerPoolConfig::default()),
    ));
    let handle = RecommendationWorkerPool::spawn(orchestrator, &pool);
    let reader = RecommendationReader::new(
        cache.clone(),
        index.clone() as Arc<dyn CandidateIndex>,
        handle,
        ttl,
    );

    Stack {
        reader,
        cache,
        store,
        index,
    }
}

/// Poll until the user's marker is gone and a list is cached, or time out
async fn wait_for_computation(cache: &Cache, user_id: i64) {
    let list = CacheKey::recommendations(user_id);
    let marker = CacheKey::processing_marker(user_id);
    for _ in 0..100 {
        let marker_gone = !cache.exists(&marker).await.expect("marker check");
        let list_present = cache.exists(&list).await.expect("list check");
        if marker_gone && list_present {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("computation for user {user_id} did not finish in time");
}

#[tokio::test]
async fn test_hit_returns_list_and_extends_ttl() {
    let ttl = CacheTtlConfig {
        recommendations_secs: 600,
        processing_marker_secs: 300,
    };
    let stack = build_stack(ttl).await;
    let key = CacheKey::recommendations(1);

    let cached = vec![EnrichedRecommendation::fallback(recipe(
        10,
        99,
        "Omelette",
        &["egg", "butter"],
    ))];
    // Seed with a short remaining TTL; the hit should extend it.
    stack
        .cache
        .set(&key, &cached, Duration::from_secs(5))
        .await
        .expect("seed cache");

    let served = stack.reader.get_recommendations(1).await;

    assert_eq!(served, cached);
    let remaining = stack.cache.ttl(&key).await.expect("ttl").expect("entry");
    assert!(remaining > Duration::from_secs(500));
    // A hit triggers no queries and no recompute.
    assert_eq!(stack.index.recent_calls.load(Ordering::SeqCst), 0);
    assert_eq!(stack.store.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_cold_miss_serves_popular_feed_and_sets_marker() {
    let stack = build_stack(CacheTtlConfig::default()).await;
    stack.store.set_pantry(1, &["egg", "butter"]);
    // Hold the recompute open long enough to observe the marker.
    stack.store.delay_ms.store(300, Ordering::SeqCst);

    let served = stack.reader.get_recommendations(1).await;

    // Popular feed: most recent recipes from other users, zero match stats.
    assert_eq!(served.len(), 2);
    assert_eq!(served[0].recipe.id, 11);
    assert_eq!(served[1].recipe.id, 10);
    assert!(served.iter().all(|r| r.matching_rate == 0.0));
    assert!(served.iter().all(|r| r.matched_count == 0));

    // The same call set the marker and enqueued the recompute.
    let marker = CacheKey::processing_marker(1);
    assert!(stack.cache.exists(&marker).await.expect("marker check"));

    wait_for_computation(&stack.cache, 1).await;
    let list = stack.reader.get_recommendations(1).await;
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].recipe.id, 10);
}

#[tokio::test]
async fn test_miss_with_computation_in_flight_serves_empty_list() {
    let stack = build_stack(CacheTtlConfig::default()).await;
    let marker = CacheKey::processing_marker(1);
    stack
        .cache
        .set(&marker, &true, Duration::from_secs(300))
        .await
        .expect("set marker");

    let served = stack.reader.get_recommendations(1).await;

    assert!(served.is_empty());
    // No fallback query and no duplicate recompute.
    assert_eq!(stack.index.recent_calls.load(Ordering::SeqCst), 0);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(stack.store.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_corrupt_entry_is_evicted_and_treated_as_miss() {
    let stack = build_stack(CacheTtlConfig::default()).await;
    stack.store.set_pantry(1, &["egg", "butter"]);
    let key = CacheKey::recommendations(1);

    // Seed bytes that do not decode as a recommendation list.
    stack
        .cache
        .set(&key, &42_u32, Duration::from_secs(600))
        .await
        .expect("seed corrupt entry");

    let served = stack.reader.get_recommendations(1).await;

    // Miss path: popular feed served, corrupt entry gone.
    assert_eq!(served.len(), 2);
    let raw: Option<u32> = stack.cache.get(&key).await.unwrap_or(None);
    assert_eq!(raw, None);

    // The recompute eventually replaces it with a valid list.
    wait_for_computation(&stack.cache, 1).await;
    let list = stack.reader.get_recommendations(1).await;
    assert_eq!(list.len(), 1);
}

#[tokio::test]
async fn test_concurrent_misses_leave_no_marker_and_a_valid_list() {
    let stack = build_stack(CacheTtlConfig::default()).await;
    stack.store.set_pantry(1, &["egg", "butter"]);
    stack.store.delay_ms.store(50, Ordering::SeqCst);

    let (a, b) = tokio::join!(
        stack.reader.get_recommendations(1),
        stack.reader.get_recommendations(1),
    );

    // Each response is one of the fallback layers, never an error.
    for served in [&a, &b] {
        assert!(served.is_empty() || served.iter().all(|r| r.matching_rate == 0.0));
    }

    wait_for_computation(&stack.cache, 1).await;

    let marker = CacheKey::processing_marker(1);
    assert!(!stack.cache.exists(&marker).await.expect("marker check"));
    let list = stack.reader.get_recommendations(1).await;
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].recipe.id, 10);
}

#[tokio::test]
async fn test_dropped_recompute_clears_marker_for_retry() {
    let pool = WorkerPoolConfig {
        recommendation_workers: 1,
        recommendation_queue_capacity: 1,
        ..WorkerPoolConfig::default()
    };
    let stack = build_stack_with_pool(CacheTtlConfig::default(), pool).await;
    for user in 1..=4 {
        stack.store.set_pantry(user, &["egg"]);
    }
    // Keep the single worker busy so the queue backs up.
    stack.store.delay_ms.store(3_000, Ordering::SeqCst);

    // User 1 occupies the worker, user 2 waits on the permit, user 3 fills
    // the queue slot; user 4's job has nowhere to go and is dropped.
    for user in 1..=3 {
        stack.reader.get_recommendations(user).await;
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    let served = stack.reader.get_recommendations(4).await;

    // The popular feed is still served, and the marker set in the same call
    // is cleared again so the next miss retries instead of waiting out the
    // marker TTL with empty "updating" responses.
    assert!(!served.is_empty());
    assert!(!stack
        .cache
        .exists(&CacheKey::processing_marker(4))
        .await
        .expect("marker check"));
    // The queued users keep their markers.
    for user in 1..=3 {
        assert!(stack
            .cache
            .exists(&CacheKey::processing_marker(user))
            .await
            .expect("marker check"));
    }
}

#[tokio::test]
async fn test_invalidate_user_clears_list_and_marker() {
    let stack = build_stack(CacheTtlConfig::default()).await;
    let list_key = CacheKey::recommendations(1);
    let marker_key = CacheKey::processing_marker(1);

    stack
        .cache
        .set(&list_key, &Vec::<EnrichedRecommendation>::new(), Duration::from_secs(600))
        .await
        .expect("seed list");
    stack
        .cache
        .set(&marker_key, &true, Duration::from_secs(300))
        .await
        .expect("seed marker");

    stack.reader.invalidate_user(1).await.expect("invalidate");

    assert!(!stack.cache.exists(&list_key).await.expect("list check"));
    assert!(!stack.cache.exists(&marker_key).await.expect("marker check"));
}
