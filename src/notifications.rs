// ABOUTME: Fire-and-forget completion notifications after a recompute finishes
// ABOUTME: Small dedicated pool so notification work never competes with recomputation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FridgeChef

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::config::WorkerPoolConfig;

/// Outcome of one finished recommendation computation
#[derive(Debug, Clone)]
pub enum CompletionNotice {
    /// The user has a fresh ranked list
    Ready {
        /// User the list was computed for
        user_id: i64,
        /// Number of recommendations in the list
        count: usize,
    },
    /// The computation finished but nothing met the matching threshold
    NoMatches {
        /// User the computation ran for
        user_id: i64,
    },
}

/// Handle for posting completion notices.
///
/// Notices ride a small bounded channel to a dedicated pool of worker tasks.
/// Posting never blocks; a full queue drops the notice with a warning. Losing
/// a notice loses a log line, not data.
#[derive(Clone)]
pub struct CompletionNotifier {
    tx: mpsc::Sender<CompletionNotice>,
}

impl CompletionNotifier {
    /// Spawn the notification workers and return the posting handle
    #[must_use]
    pub fn spawn(config: &WorkerPoolConfig) -> Self {
        let (tx, rx) = mpsc::channel::<CompletionNotice>(config.notification_queue_capacity.max(1));
        let rx = Arc::new(tokio::sync::Mutex::new(rx));

        for _ in 0..config.notification_workers.max(1) {
            let rx = rx.clone();
            tokio::spawn(async move {
                loop {
                    let notice = rx.lock().await.recv().await;
                    match notice {
                        Some(notice) => Self::deliver(&notice),
                        None => break,
                    }
                }
            });
        }

        Self { tx }
    }

    fn deliver(notice: &CompletionNotice) {
        match notice {
            CompletionNotice::Ready { user_id, count } => {
                info!(user_id, count, "recommendations ready");
            }
            CompletionNotice::NoMatches { user_id } => {
                info!(user_id, "no recipes matched, recommendations will retry on next update");
            }
        }
    }

    /// Post a notice without blocking
    pub fn notify(&self, notice: CompletionNotice) {
        if let Err(e) = self.tx.try_send(notice) {
            warn!(error = %e, "notification queue full or closed, dropping notice");
        }
    }

    /// Post a "recommendations ready" notice
    pub fn notify_ready(&self, user_id: i64, count: usize) {
        self.notify(CompletionNotice::Ready { user_id, count });
    }

    /// Post a "nothing matched" notice
    pub fn notify_no_matches(&self, user_id: i64) {
        self.notify(CompletionNotice::NoMatches { user_id });
    }
}
