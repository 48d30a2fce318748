// ABOUTME: Domain models for the recommendation engine
// ABOUTME: Recipes, match analysis, the cached recommendation unit, and the trigger event
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FridgeChef

use serde::{Deserialize, Serialize};

/// One ingredient entry of a recipe.
///
/// Only `food_name` participates in matching; quantity, unit, and the
/// required flag ride along for display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RecipeIngredient {
    /// Ingredient name used for matching
    pub food_name: String,
    /// Display quantity ("2", "1/2"), free-form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    /// Display unit ("g", "tbsp"), free-form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Whether the author marked this ingredient as required ("Y"/"N")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<String>,
}

impl RecipeIngredient {
    /// Ingredient with a name only, for construction in tests and fallbacks
    #[must_use]
    pub fn named(food_name: impl Into<String>) -> Self {
        Self {
            food_name: food_name.into(),
            quantity: None,
            unit: None,
            required: None,
        }
    }
}

/// One preparation step of a recipe
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RecipeStep {
    /// Step instruction text
    pub description: String,
    /// Optional step image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// A recipe snapshot, immutable for the duration of one computation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Recipe id
    pub id: i64,
    /// Owning author's user id
    pub author_id: i64,
    /// Recipe title
    pub title: String,
    /// Cover image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Ordered ingredient list; names may repeat
    pub ingredients: Vec<RecipeIngredient>,
    /// Ordered preparation steps
    #[serde(default)]
    pub steps: Vec<RecipeStep>,
}

impl Recipe {
    /// Names of this recipe's ingredient entries, in order, duplicates kept
    #[must_use]
    pub fn ingredient_names(&self) -> Vec<String> {
        self.ingredients
            .iter()
            .map(|i| i.food_name.clone())
            .collect()
    }
}

/// Result of matching one recipe against one user's pantry.
///
/// Ephemeral: exists only inside one computation pass, never persisted on
/// its own.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MatchAnalysis {
    /// Ingredient entries present in the pantry (duplicates counted)
    pub matched_count: usize,
    /// Total ingredient entries in the recipe (duplicates counted)
    pub total_ingredients: usize,
    /// 100 * matched / total; 0 for an ingredient-less recipe
    pub matching_rate: f64,
    /// Recipe ingredients absent from the pantry, original order
    pub missing_ingredients: Vec<String>,
}

/// A match analysis combined with the full recipe detail.
///
/// The cached unit: a user's cached value is an ordered list of up to ten of
/// these, sorted descending by `matching_rate`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedRecommendation {
    /// Percentage of the recipe's ingredient entries the user holds
    pub matching_rate: f64,
    /// Matched ingredient entries
    pub matched_count: usize,
    /// Total ingredient entries
    pub total_ingredients: usize,
    /// Ingredients the user is missing, original order
    pub missing_ingredients: Vec<String>,
    /// Full recipe detail for display
    pub recipe: Recipe,
}

impl EnrichedRecommendation {
    /// Combine a match analysis with recipe detail
    #[must_use]
    pub fn new(analysis: MatchAnalysis, recipe: Recipe) -> Self {
        Self {
            matching_rate: analysis.matching_rate,
            matched_count: analysis.matched_count,
            total_ingredients: analysis.total_ingredients,
            missing_ingredients: analysis.missing_ingredients,
            recipe,
        }
    }

    /// Wrap a recipe with zero/default match statistics.
    ///
    /// Used for the popular-recipes fallback feed so first-time visitors
    /// never see a bare empty list.
    #[must_use]
    pub fn fallback(recipe: Recipe) -> Self {
        Self {
            matching_rate: 0.0,
            matched_count: 0,
            total_ingredients: recipe.ingredients.len(),
            missing_ingredients: Vec::new(),
            recipe,
        }
    }

    /// Matching rate as a rounded percentage string, e.g. `"67%"`
    #[must_use]
    pub fn matching_rate_percent(&self) -> String {
        format!("{:.0}%", self.matching_rate)
    }

    /// Short description of how many ingredients the user holds,
    /// e.g. `"5/6 ingredients on hand"`
    #[must_use]
    pub fn matching_description(&self) -> String {
        format!(
            "{}/{} ingredients on hand",
            self.matched_count, self.total_ingredients
        )
    }
}

/// Signal that a user finished registering fridge ingredients.
///
/// Emitted by the ingredient registration flow only after its write has
/// durably committed; triggers an asynchronous recommendation recompute.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientRegisteredEvent {
    /// User who registered the ingredients
    pub user_id: i64,
    /// Ids of the newly registered foods
    pub food_ids: Vec<i64>,
    /// Names of the newly registered foods
    pub food_names: Vec<String>,
}

impl IngredientRegisteredEvent {
    /// Number of ingredients registered in this batch
    #[must_use]
    pub fn registered_count(&self) -> usize {
        self.food_ids.len()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    fn sample_recipe() -> Recipe {
        Recipe {
            id: 7,
            author_id: 3,
            title: "Tomato Soup".into(),
            image_url: None,
            ingredients: vec![
                RecipeIngredient::named("tomato"),
                RecipeIngredient::named("onion"),
                RecipeIngredient::named("garlic"),
            ],
            steps: vec![RecipeStep {
                description: "Simmer everything.".into(),
                image_url: None,
            }],
        }
    }

    #[test]
    fn test_matching_rate_percent_rounds() {
        let analysis = MatchAnalysis {
            matched_count: 2,
            total_ingredients: 3,
            matching_rate: 200.0 / 3.0,
            missing_ingredients: vec!["garlic".into()],
        };
        let rec = EnrichedRecommendation::new(analysis, sample_recipe());
        assert_eq!(rec.matching_rate_percent(), "67%");
        assert_eq!(rec.matching_description(), "2/3 ingredients on hand");
    }

    #[test]
    fn test_fallback_has_zero_stats() {
        let rec = EnrichedRecommendation::fallback(sample_recipe());
        assert_eq!(rec.matching_rate, 0.0);
        assert_eq!(rec.matched_count, 0);
        assert_eq!(rec.total_ingredients, 3);
        assert!(rec.missing_ingredients.is_empty());
    }

    #[test]
    fn test_recommendation_round_trips_through_json() {
        let rec = EnrichedRecommendation::fallback(sample_recipe());
        let json = serde_json::to_string(&rec).expect("serialize");
        let back: EnrichedRecommendation = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, rec);
    }

    #[test]
    fn test_event_count() {
        let event = IngredientRegisteredEvent {
            user_id: 1,
            food_ids: vec![10, 11],
            food_names: vec!["egg".into(), "milk".into()],
        };
        assert_eq!(event.registered_count(), 2);
    }
}
