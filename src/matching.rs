// ABOUTME: Pure ingredient matching engine
// ABOUTME: Computes match count, rate, and missing ingredients for one recipe against one pantry
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FridgeChef

//! The matching engine: pure functions, no I/O, no side effects.
//!
//! Comparison is list-based on the recipe side: a recipe listing the same
//! ingredient name twice counts it twice in both `matched_count` and
//! `total_ingredients`. This mirrors the upstream data, where ingredient
//! entries are rows, not a set.

use crate::constants::recommendation::MIN_MATCHING_RATE;
use crate::models::MatchAnalysis;
use std::collections::HashSet;

/// Analyze one recipe's ingredient names against the user's pantry.
///
/// `matching_rate` is `100 * matched / total`, and `0.0` for a recipe with
/// no ingredient entries. `missing_ingredients` keeps the recipe's original
/// order, duplicates included.
#[must_use]
pub fn analyze(recipe_ingredient_names: &[String], pantry: &HashSet<String>) -> MatchAnalysis {
    let total_ingredients = recipe_ingredient_names.len();

    let matched_count = recipe_ingredient_names
        .iter()
        .filter(|name| pantry.contains(*name))
        .count();

    let missing_ingredients: Vec<String> = recipe_ingredient_names
        .iter()
        .filter(|name| !pantry.contains(*name))
        .cloned()
        .collect();

    let matching_rate = if total_ingredients == 0 {
        0.0
    } else {
        matched_count as f64 / total_ingredients as f64 * 100.0
    };

    MatchAnalysis {
        matched_count,
        total_ingredients,
        matching_rate,
        missing_ingredients,
    }
}

/// Whether a matching rate qualifies a recipe for recommendation.
///
/// The threshold is inclusive: exactly 30.0 qualifies.
#[must_use]
pub fn meets_threshold(matching_rate: f64) -> bool {
    matching_rate >= MIN_MATCHING_RATE
}
