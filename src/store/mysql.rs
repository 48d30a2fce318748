// ABOUTME: MySQL implementations of the ingredient store and candidate index
// ABOUTME: JSON_TABLE overlap ranking with a JSON_OVERLAPS fallback query
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FridgeChef

use std::collections::{HashMap, HashSet};

use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};
use tracing::warn;

use crate::errors::{AppError, AppResult};
use crate::models::{Recipe, RecipeIngredient, RecipeStep};
use crate::store::{CandidateIndex, IngredientStore};

/// MySQL-backed ingredient store
pub struct MySqlIngredientStore {
    pool: MySqlPool,
}

impl MySqlIngredientStore {
    /// Create a store over an existing pool
    #[must_use]
    pub const fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl IngredientStore for MySqlIngredientStore {
    async fn current_ingredient_names(&self, user_id: i64) -> AppResult<Vec<String>> {
        let rows = sqlx::query(
            r"
            SELECT food_name
            FROM fridge_ingredients
            WHERE user_id = ?
            ORDER BY created_at DESC
            ",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::database(format!("Failed to load fridge ingredients: {e}"))
                .with_user_id(user_id)
        })?;

        // Dedupe in code, preserving the recency order the query produced.
        let mut seen = HashSet::new();
        let mut names = Vec::new();
        for row in rows {
            let name: String = row
                .try_get("food_name")
                .map_err(|e| AppError::database(format!("Bad fridge ingredient row: {e}")))?;
            if seen.insert(name.clone()) {
                names.push(name);
            }
        }

        Ok(names)
    }
}

/// MySQL-backed candidate index.
///
/// The ranked query unnests the recipe's ingredient JSON with `JSON_TABLE`
/// and counts overlap at the storage layer; the fallback only asks
/// `JSON_OVERLAPS` whether any name matches.
pub struct MySqlCandidateIndex {
    pool: MySqlPool,
}

impl MySqlCandidateIndex {
    /// Create an index over an existing pool
    #[must_use]
    pub const fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn placeholders(count: usize) -> String {
        vec!["?"; count].join(", ")
    }

    /// Map a recipe row, skipping rows whose ingredient JSON is malformed.
    ///
    /// A broken row must never sink the whole batch; the recipe is simply
    /// not a candidate this round.
    fn row_to_recipe(row: &MySqlRow) -> AppResult<Option<Recipe>> {
        let id: i64 = row
            .try_get("recipe_id")
            .map_err(|e| AppError::database(format!("Bad recipe row: {e}")))?;
        let author_id: i64 = row
            .try_get("user_id")
            .map_err(|e| AppError::database(format!("Bad recipe row: {e}")))?;
        let title: String = row
            .try_get("title")
            .map_err(|e| AppError::database(format!("Bad recipe row: {e}")))?;
        let image_url: Option<String> = row
            .try_get("image_url")
            .map_err(|e| AppError::database(format!("Bad recipe row: {e}")))?;
        let ingredients_json: String = row
            .try_get("ingredients")
            .map_err(|e| AppError::database(format!("Bad recipe row: {e}")))?;

        let ingredients: Vec<RecipeIngredient> = match serde_json::from_str(&ingredients_json) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(recipe_id = id, error = %e, "skipping recipe with malformed ingredient JSON");
                return Ok(None);
            }
        };

        Ok(Some(Recipe {
            id,
            author_id,
            title,
            image_url,
            ingredients,
            steps: Vec::new(),
        }))
    }

    fn rows_to_recipes(rows: &[MySqlRow]) -> AppResult<Vec<Recipe>> {
        let mut recipes = Vec::with_capacity(rows.len());
        for row in rows {
            if let Some(recipe) = Self::row_to_recipe(row)? {
                recipes.push(recipe);
            }
        }
        Ok(recipes)
    }

    /// Load preparation steps for a batch of recipes and attach them
    async fn attach_steps(&self, recipes: &mut [Recipe]) -> AppResult<()> {
        if recipes.is_empty() {
            return Ok(());
        }

        let ids: Vec<i64> = recipes.iter().map(|r| r.id).collect();
        let query = format!(
            r"
            SELECT recipe_id, description, image_url
            FROM recipe_steps
            WHERE recipe_id IN ({})
            ORDER BY recipe_id, step_order
            ",
            Self::placeholders(ids.len())
        );

        let mut q = sqlx::query(&query);
        for id in &ids {
            q = q.bind(id);
        }

        let rows = q
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to load recipe steps: {e}")))?;

        let mut steps_by_recipe: HashMap<i64, Vec<RecipeStep>> = HashMap::new();
        for row in rows {
            let recipe_id: i64 = row
                .try_get("recipe_id")
                .map_err(|e| AppError::database(format!("Bad recipe step row: {e}")))?;
            let description: String = row
                .try_get("description")
                .map_err(|e| AppError::database(format!("Bad recipe step row: {e}")))?;
            let image_url: Option<String> = row
                .try_get("image_url")
                .map_err(|e| AppError::database(format!("Bad recipe step row: {e}")))?;

            steps_by_recipe.entry(recipe_id).or_default().push(RecipeStep {
                description,
                image_url,
            });
        }

        for recipe in recipes.iter_mut() {
            if let Some(steps) = steps_by_recipe.remove(&recipe.id) {
                recipe.steps = steps;
            }
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl CandidateIndex for MySqlCandidateIndex {
    async fn top_matching_by_overlap(
        &self,
        ingredient_names: &[String],
        exclude_user_id: i64,
        limit: u32,
    ) -> AppResult<Vec<Recipe>> {
        if ingredient_names.is_empty() {
            return Ok(Vec::new());
        }

        // Unnest each recipe's ingredient names with JSON_TABLE and rank by
        // how many fall inside the user's pantry. Matching-rate refinement
        // happens in the engine; this only orders candidates by raw overlap.
        let query = format!(
            r"
            SELECT r.recipe_id, r.user_id, r.title, r.image_url, r.ingredients
            FROM recipes r
            JOIN (
                SELECT r2.recipe_id, COUNT(*) AS match_count
                FROM recipes r2,
                     JSON_TABLE(r2.ingredients, '$[*]' COLUMNS (
                         food_name VARCHAR(255) PATH '$.foodName'
                     )) jt
                WHERE r2.user_id <> ?
                  AND jt.food_name IN ({})
                GROUP BY r2.recipe_id
            ) m ON m.recipe_id = r.recipe_id
            WHERE r.user_id <> ?
            ORDER BY m.match_count DESC, r.created_at DESC
            LIMIT ?
            ",
            Self::placeholders(ingredient_names.len())
        );

        let mut q = sqlx::query(&query).bind(exclude_user_id);
        for name in ingredient_names {
            q = q.bind(name);
        }
        q = q.bind(exclude_user_id).bind(i64::from(limit));

        let rows = q.fetch_all(&self.pool).await.map_err(|e| {
            AppError::database(format!("Ranked overlap query failed: {e}"))
                .with_user_id(exclude_user_id)
        })?;

        Self::rows_to_recipes(&rows)
    }

    async fn any_overlap(
        &self,
        ingredient_names: &[String],
        exclude_user_id: i64,
        limit: u32,
    ) -> AppResult<Vec<Recipe>> {
        if ingredient_names.is_empty() {
            return Ok(Vec::new());
        }

        let names_json = serde_json::to_string(ingredient_names)
            .map_err(|e| AppError::serialization(format!("ingredient list encode failed: {e}")))?;

        let rows = sqlx::query(
            r"
            SELECT recipe_id, user_id, title, image_url, ingredients
            FROM recipes
            WHERE user_id <> ?
              AND JSON_OVERLAPS(ingredients->'$[*].foodName', CAST(? AS JSON))
            ORDER BY created_at DESC
            LIMIT ?
            ",
        )
        .bind(exclude_user_id)
        .bind(&names_json)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::database(format!("Any-overlap query failed: {e}"))
                .with_user_id(exclude_user_id)
        })?;

        Self::rows_to_recipes(&rows)
    }

    async fn by_ids(&self, ids: &[i64]) -> AppResult<Vec<Recipe>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!(
            r"
            SELECT recipe_id, user_id, title, image_url, ingredients
            FROM recipes
            WHERE recipe_id IN ({})
            ",
            Self::placeholders(ids.len())
        );

        let mut q = sqlx::query(&query);
        for id in ids {
            q = q.bind(id);
        }

        let rows = q
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Recipe batch lookup failed: {e}")))?;

        let mut recipes = Self::rows_to_recipes(&rows)?;
        self.attach_steps(&mut recipes).await?;
        Ok(recipes)
    }

    async fn recent_excluding(&self, user_id: i64, limit: u32) -> AppResult<Vec<Recipe>> {
        let rows = sqlx::query(
            r"
            SELECT recipe_id, user_id, title, image_url, ingredients
            FROM recipes
            WHERE user_id <> ?
            ORDER BY created_at DESC
            LIMIT ?
            ",
        )
        .bind(user_id)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::database(format!("Recent recipes query failed: {e}")).with_user_id(user_id)
        })?;

        let mut recipes = Self::rows_to_recipes(&rows)?;
        self.attach_steps(&mut recipes).await?;
        Ok(recipes)
    }
}
