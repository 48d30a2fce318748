// ABOUTME: Structured logging setup for the recommendation engine
// ABOUTME: Tracing subscriber initialization with env-filter and format selection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FridgeChef

use std::env;
use std::sync::Once;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable compact output (development default)
    Compact,
    /// JSON output for log aggregation
    Json,
}

impl LogFormat {
    /// Resolve the format from the `LOG_FORMAT` environment variable
    #[must_use]
    pub fn from_env() -> Self {
        match env::var("LOG_FORMAT").as_deref() {
            Ok("json") => Self::Json,
            _ => Self::Compact,
        }
    }
}

/// Initialize tracing for the engine.
///
/// Filter comes from `RUST_LOG` (default `info`), format from `LOG_FORMAT`.
/// Safe to call more than once; only the first call installs a subscriber,
/// so tests and embedding applications can both call it freely.
pub fn init() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        match LogFormat::from_env() {
            LogFormat::Json => {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().json().with_target(true))
                    .init();
            }
            LogFormat::Compact => {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().compact().with_target(true))
                    .init();
            }
        }
    });
}
