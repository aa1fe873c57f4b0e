use std::collections::HashMap;

use sqlx::{Pool, QueryBuilder, Sqlite};

use crate::constants::MAX_BIND_PARAMETERS;

use super::{
    error::{ApiError, QueryError},
    schema::{Id, Ingredient, Recipe, RecipeView},
};

pub mod categories;
pub mod ingredients;
pub mod recipes;
pub mod users;

pub use categories::*;
pub use ingredients::*;
pub use recipes::*;
pub use users::*;

/// Ingredients of every listed recipe, one query per `MAX_BIND_PARAMETERS` ids.
pub async fn list_ingredients_for_recipes(
    recipe_ids: &[Id],
    pool: &Pool<Sqlite>,
) -> Result<Vec<Ingredient>, ApiError> {
    let mut rows: Vec<Ingredient> = Vec::with_capacity(recipe_ids.len());

    for chunk in recipe_ids.chunks(MAX_BIND_PARAMETERS) {
        let mut query_builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT * FROM ingredients WHERE recipe_id IN (");

        let mut separated = query_builder.separated(", ");
        for id in chunk {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ORDER BY id");

        let mut chunk_rows: Vec<Ingredient> = query_builder
            .build_query_as()
            .fetch_all(pool)
            .await
            .map_err(QueryError::from)?;

        rows.append(&mut chunk_rows);
    }

    Ok(rows)
}

/// Pairs each recipe with its ingredients, keeping the order of `recipes`.
pub fn attach_ingredients(recipes: Vec<Recipe>, ingredients: Vec<Ingredient>) -> Vec<RecipeView> {
    let mut hashmap: HashMap<Id, Vec<Ingredient>> = HashMap::new();
    ingredients.into_iter().for_each(|ingredient| {
        hashmap
            .entry(ingredient.recipe_id)
            .or_default()
            .push(ingredient)
    });

    recipes
        .into_iter()
        .map(|recipe| RecipeView {
            ingredients: hashmap.remove(&recipe.id).unwrap_or_default(),
            recipe,
        })
        .collect()
}

/// Loads the ingredients of `recipes` and builds their views.
pub async fn recipe_views(
    recipes: Vec<Recipe>,
    pool: &Pool<Sqlite>,
) -> Result<Vec<RecipeView>, ApiError> {
    let ids: Vec<Id> = recipes.iter().map(|recipe| recipe.id).collect();
    let ingredients = list_ingredients_for_recipes(&ids, pool).await?;

    Ok(attach_ingredients(recipes, ingredients))
}

/// Groups already-built recipe views by an owner key such as `category_id`.
pub fn group_recipe_views<F>(views: Vec<RecipeView>, owner: F) -> HashMap<Id, Vec<RecipeView>>
where
    F: Fn(&Recipe) -> Option<Id>,
{
    let mut hashmap: HashMap<Id, Vec<RecipeView>> = HashMap::new();
    for view in views {
        if let Some(key) = owner(&view.recipe) {
            hashmap.entry(key).or_default().push(view);
        }
    }

    hashmap
}
