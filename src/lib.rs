// ABOUTME: Main library entry point for the FridgeChef recommendation engine
// ABOUTME: Ingredient-matched recipe ranking with cache-aside delivery and async recomputation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FridgeChef

#![deny(unsafe_code)]

//! # FridgeChef Recommendation Engine
//!
//! The recommendation subsystem of the FridgeChef backend: after a user
//! registers fridge ingredients, a bounded worker pool computes a ranked
//! list of matching recipes, caches it with a TTL, and a non-blocking
//! reader serves it later with layered fallbacks.
//!
//! ## Architecture
//!
//! - **Matching**: pure ingredient-overlap analysis per recipe
//! - **Store**: interfaces to the durable ingredient/recipe stores, with
//!   MySQL implementations of the two-tier candidate queries
//! - **Cache**: pluggable recommendation cache (in-memory or Redis) holding
//!   the per-user ranked list and the in-flight computation marker
//! - **Orchestrator**: the end-to-end recompute pipeline
//! - **Reader**: the cache-aside read path that never blocks on a recompute
//!
//! ## Example
//!
//! ```rust,no_run
//! use fridgechef_recommend::cache::factory::Cache;
//! use fridgechef_recommend::cache::CacheProvider;
//! use fridgechef_recommend::errors::AppResult;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let cache = Cache::from_env().await?;
//!     cache.health_check().await?;
//!     Ok(())
//! }
//! ```

// ── Public API ──────────────────────────────────────────────────────────

/// Recommendation cache protocol and backends (in-memory, Redis)
pub mod cache;

/// Environment-driven configuration
pub mod config;

/// Policy constants and backend tunables
pub mod constants;

/// Unified error handling
pub mod errors;

/// Structured logging setup
pub mod logging;

/// Pure ingredient matching engine
pub mod matching;

/// Domain models and the cached recommendation unit
pub mod models;

/// Completion notifications on a dedicated light worker pool
pub mod notifications;

/// Recompute orchestration, the read path, and the worker pool
pub mod recommendation;

/// Ingredient store and recipe candidate index interfaces
pub mod store;

pub use errors::{AppError, AppResult};
pub use models::{EnrichedRecommendation, IngredientRegisteredEvent, MatchAnalysis, Recipe};
