use sqlx::{Pool, Sqlite};

use crate::{
    error::{ApiError, HtmlError, QueryError},
    schema::{Id, Ingredient, IngredientChanges, NewIngredient},
};

use super::get_recipe;

pub async fn list_ingredients(pool: &Pool<Sqlite>) -> Result<Vec<Ingredient>, ApiError> {
    let rows: Vec<Ingredient> = sqlx::query_as("SELECT * FROM ingredients ORDER BY id")
        .fetch_all(pool)
        .await
        .map_err(QueryError::from)?;

    Ok(rows)
}

pub async fn get_ingredient(id: Id, pool: &Pool<Sqlite>) -> Result<Option<Ingredient>, ApiError> {
    let row: Option<Ingredient> = sqlx::query_as("SELECT * FROM ingredients WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(QueryError::from)?;

    Ok(row)
}

/// The owning recipe must exist; a missing one is a 404 rather than a 400.
pub async fn create_ingredient(
    ingredient: NewIngredient,
    pool: &Pool<Sqlite>,
) -> Result<Ingredient, ApiError> {
    if get_recipe(ingredient.recipe_id, pool).await?.is_none() {
        return Err(HtmlError::NotFound.new("No recipe exists with specified id"));
    }

    let row: Ingredient = sqlx::query_as(
        "
        INSERT INTO ingredients (name, quantity, recipe_id)
        VALUES ($1, $2, $3)
        RETURNING *
    ",
    )
    .bind(ingredient.name)
    .bind(ingredient.quantity)
    .bind(ingredient.recipe_id)
    .fetch_one(pool)
    .await
    .map_err(QueryError::from)?;

    log::info!(
        "> Created ingredient {} ({}) for recipe {}",
        row.id,
        row.name,
        row.recipe_id
    );

    Ok(row)
}

pub async fn update_ingredient(
    id: Id,
    changes: IngredientChanges,
    pool: &Pool<Sqlite>,
) -> Result<Option<Ingredient>, ApiError> {
    if get_ingredient(id, pool).await?.is_none() {
        return Ok(None);
    }

    if let Some(recipe_id) = changes.recipe_id {
        if get_recipe(recipe_id, pool).await?.is_none() {
            return Err(HtmlError::InvalidRequest.new("Recipe doesn't exist"));
        }
    }

    let row: Option<Ingredient> = sqlx::query_as(
        "
        UPDATE ingredients SET
        name = COALESCE($1, name),
        quantity = COALESCE($2, quantity),
        recipe_id = COALESCE($3, recipe_id)
        WHERE id = $4
        RETURNING *
    ",
    )
    .bind(changes.name)
    .bind(changes.quantity)
    .bind(changes.recipe_id)
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(QueryError::from)?;

    Ok(row)
}

pub async fn delete_ingredient(id: Id, pool: &Pool<Sqlite>) -> Result<bool, ApiError> {
    let result = sqlx::query("DELETE FROM ingredients WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(QueryError::from)?;

    Ok(result.rows_affected() > 0)
}
