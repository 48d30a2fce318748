// ABOUTME: The recommendation feature: compute, serve, and schedule
// ABOUTME: Orchestrator writes the cache, the reader serves it, the worker pool schedules recomputes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FridgeChef

/// Computation pipeline from pantry to cached ranked list
pub mod orchestrator;
/// Non-blocking read path with layered fallbacks
pub mod reader;
/// Bounded worker pool scheduling recomputations
pub mod worker;

pub use orchestrator::RecommendationOrchestrator;
pub use reader::RecommendationReader;
pub use worker::{RecommendationWorkerPool, RecomputeHandle, RecomputeTrigger};
