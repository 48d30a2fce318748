// ABOUTME: Bounded worker pool for recommendation recomputation
// ABOUTME: Non-blocking enqueue with drop-on-full; a later cache miss retriggers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FridgeChef

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::cache::CacheProvider;
use crate::config::WorkerPoolConfig;
use crate::models::IngredientRegisteredEvent;
use crate::recommendation::orchestrator::RecommendationOrchestrator;

/// Why a recompute was requested, recorded for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecomputeTrigger {
    /// The user registered new fridge ingredients
    IngredientsRegistered {
        /// How many ingredients the batch registered
        count: usize,
    },
    /// A read found no cached list for the user
    CacheMiss,
}

impl fmt::Display for RecomputeTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IngredientsRegistered { count } => write!(f, "ingredients-registered({count})"),
            Self::CacheMiss => write!(f, "cache-miss"),
        }
    }
}

struct RecomputeJob {
    user_id: i64,
    trigger: RecomputeTrigger,
}

/// Pool of recomputation workers dedicated to this feature.
///
/// A bounded queue feeds a dispatcher task; a semaphore caps how many
/// recomputations run at once so a burst of registrations cannot monopolize
/// the runtime. Cross-user computations are independent.
pub struct RecommendationWorkerPool;

impl RecommendationWorkerPool {
    /// Spawn the dispatcher and return the clonable enqueue handle
    #[must_use]
    pub fn spawn<C: CacheProvider + 'static>(
        orchestrator: Arc<RecommendationOrchestrator<C>>,
        config: &WorkerPoolConfig,
    ) -> RecomputeHandle {
        let (tx, mut rx) = mpsc::channel::<RecomputeJob>(config.recommendation_queue_capacity.max(1));
        let semaphore = Arc::new(Semaphore::new(config.recommendation_workers.max(1)));

        tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                let permit = match semaphore.clone().acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => break,
                };
                let orchestrator = orchestrator.clone();

                tokio::spawn(async move {
                    debug!(
                        user_id = job.user_id,
                        trigger = %job.trigger,
                        "starting recommendation recompute"
                    );
                    if let Err(e) = orchestrator.recompute(job.user_id).await {
                        warn!(user_id = job.user_id, error = %e, "recommendation recompute failed");
                    }
                    drop(permit);
                });
            }
            debug!("recommendation worker pool shut down");
        });

        RecomputeHandle { tx }
    }
}

/// Clonable handle for enqueueing recompute jobs.
///
/// Enqueueing never blocks the caller. A full queue drops the job with a
/// warning; the next cache miss for that user retriggers it, so a dropped
/// job delays freshness rather than losing it.
#[derive(Clone)]
pub struct RecomputeHandle {
    tx: mpsc::Sender<RecomputeJob>,
}

impl RecomputeHandle {
    /// Request a recompute for a user; returns whether the job was queued
    pub fn request(&self, user_id: i64, trigger: RecomputeTrigger) -> bool {
        match self.tx.try_send(RecomputeJob { user_id, trigger }) {
            Ok(()) => true,
            Err(TrySendError::Full(job)) => {
                warn!(
                    user_id = job.user_id,
                    trigger = %job.trigger,
                    "recompute queue full, dropping job"
                );
                false
            }
            Err(TrySendError::Closed(job)) => {
                warn!(
                    user_id = job.user_id,
                    trigger = %job.trigger,
                    "recompute queue closed, dropping job"
                );
                false
            }
        }
    }

    /// Post-commit signal that a user registered ingredients.
    ///
    /// The caller must emit this only after its ingredient write has durably
    /// committed, so the recompute reads the post-write pantry.
    pub fn ingredients_registered(&self, event: &IngredientRegisteredEvent) -> bool {
        self.request(
            event.user_id,
            RecomputeTrigger::IngredientsRegistered {
                count: event.registered_count(),
            },
        )
    }
}
