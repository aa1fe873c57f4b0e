use sqlx::{Pool, Sqlite};

use crate::{
    error::{ApiError, HtmlError, QueryError},
    schema::{Id, NewRecipe, Recipe, RecipeChanges, RecipeView},
};

use super::{get_category, get_user, recipe_views};

pub async fn list_recipes(pool: &Pool<Sqlite>) -> Result<Vec<Recipe>, ApiError> {
    let rows: Vec<Recipe> = sqlx::query_as("SELECT * FROM recipes ORDER BY id")
        .fetch_all(pool)
        .await
        .map_err(QueryError::from)?;

    Ok(rows)
}

pub async fn get_recipe(id: Id, pool: &Pool<Sqlite>) -> Result<Option<Recipe>, ApiError> {
    let row: Option<Recipe> = sqlx::query_as("SELECT * FROM recipes WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(QueryError::from)?;

    Ok(row)
}

/// Rejects references to a category or user that doesn't exist.
async fn check_references(
    category_id: Option<Id>,
    user_id: Option<Id>,
    pool: &Pool<Sqlite>,
) -> Result<(), ApiError> {
    if let Some(category_id) = category_id {
        if get_category(category_id, pool).await?.is_none() {
            return Err(HtmlError::InvalidRequest.new("Category doesn't exist"));
        }
    }

    if let Some(user_id) = user_id {
        if get_user(user_id, pool).await?.is_none() {
            return Err(HtmlError::InvalidRequest.new("User doesn't exist"));
        }
    }

    Ok(())
}

pub async fn create_recipe(recipe: NewRecipe, pool: &Pool<Sqlite>) -> Result<Recipe, ApiError> {
    check_references(Some(recipe.category_id), recipe.user_id, pool).await?;

    let row: Recipe = sqlx::query_as(
        "
        INSERT INTO recipes (name, description, category_id, user_id)
        VALUES ($1, $2, $3, $4)
        RETURNING *
    ",
    )
    .bind(recipe.name)
    .bind(recipe.description)
    .bind(recipe.category_id)
    .bind(recipe.user_id)
    .fetch_one(pool)
    .await
    .map_err(QueryError::from)?;

    log::info!("> Created recipe {} ({})", row.id, row.name);

    Ok(row)
}

/// Overwrites only the fields set in `changes`. `None` when no such recipe.
pub async fn update_recipe(
    id: Id,
    changes: RecipeChanges,
    pool: &Pool<Sqlite>,
) -> Result<Option<Recipe>, ApiError> {
    if get_recipe(id, pool).await?.is_none() {
        return Ok(None);
    }

    check_references(changes.category_id, changes.user_id, pool).await?;

    let row: Option<Recipe> = sqlx::query_as(
        "
        UPDATE recipes SET
        name = COALESCE($1, name),
        description = COALESCE($2, description),
        category_id = COALESCE($3, category_id),
        user_id = COALESCE($4, user_id)
        WHERE id = $5
        RETURNING *
    ",
    )
    .bind(changes.name)
    .bind(changes.description)
    .bind(changes.category_id)
    .bind(changes.user_id)
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(QueryError::from)?;

    Ok(row)
}

/// Deletes the recipe and its ingredients. Returns false when no such recipe.
pub async fn delete_recipe(id: Id, pool: &Pool<Sqlite>) -> Result<bool, ApiError> {
    let mut tr = pool
        .begin()
        .await
        .map_err(|_| QueryError::new("Could not start transaction".to_owned()))?;

    sqlx::query("DELETE FROM ingredients WHERE recipe_id = $1")
        .bind(id)
        .execute(&mut *tr)
        .await
        .map_err(QueryError::from)?;

    let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
        .bind(id)
        .execute(&mut *tr)
        .await
        .map_err(QueryError::from)?;

    if result.rows_affected() == 0 {
        tr.rollback()
            .await
            .map_err(|_| QueryError::new("Could not roll back transaction".to_owned()))?;
        return Ok(false);
    }

    tr.commit()
        .await
        .map_err(|_| QueryError::new("Could not commit transaction".to_owned()))?;

    log::info!("> Deleted recipe {id}");

    Ok(true)
}

pub async fn recipe_view(recipe: Recipe, pool: &Pool<Sqlite>) -> Result<RecipeView, ApiError> {
    let mut views = recipe_views(vec![recipe], pool).await?;

    views
        .pop()
        .ok_or_else(|| HtmlError::InternalServerError.new("Recipe view went missing"))
}

pub async fn list_recipe_views(pool: &Pool<Sqlite>) -> Result<Vec<RecipeView>, ApiError> {
    let recipes = list_recipes(pool).await?;

    recipe_views(recipes, pool).await
}
