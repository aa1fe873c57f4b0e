use sqlx::{Pool, Sqlite};

use crate::{
    error::{ApiError, HtmlError, QueryError},
    schema::{Category, CategoryView, Id, Recipe},
};

use super::{group_recipe_views, recipe_views};

pub async fn list_categories(pool: &Pool<Sqlite>) -> Result<Vec<Category>, ApiError> {
    let rows: Vec<Category> = sqlx::query_as("SELECT * FROM categories ORDER BY id")
        .fetch_all(pool)
        .await
        .map_err(QueryError::from)?;

    Ok(rows)
}

pub async fn get_category(id: Id, pool: &Pool<Sqlite>) -> Result<Option<Category>, ApiError> {
    let row: Option<Category> = sqlx::query_as("SELECT * FROM categories WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(QueryError::from)?;

    Ok(row)
}

pub async fn create_category(name: &str, pool: &Pool<Sqlite>) -> Result<Category, ApiError> {
    let row: Option<Category> = sqlx::query_as(
        "
        INSERT INTO categories (name)
        VALUES ($1)
        ON CONFLICT DO NOTHING RETURNING *;
    ",
    )
    .bind(name)
    .fetch_optional(pool)
    .await
    .map_err(QueryError::from)?;

    match row {
        Some(category) => {
            log::info!("> Created category {} ({})", category.id, category.name);
            Ok(category)
        }
        None => Err(HtmlError::Conflict.new("Category with that name already exists")),
    }
}

/// Renames the category when `name` is given. `None` when no such category.
pub async fn update_category(
    id: Id,
    name: Option<String>,
    pool: &Pool<Sqlite>,
) -> Result<Option<Category>, ApiError> {
    let row: Option<Category> = sqlx::query_as(
        "UPDATE categories SET name = COALESCE($1, name) WHERE id = $2 RETURNING *",
    )
    .bind(name)
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(QueryError::from)?;

    Ok(row)
}

/// Deletes the category with its recipes and their ingredients.
/// Returns false when no such category exists.
pub async fn delete_category(id: Id, pool: &Pool<Sqlite>) -> Result<bool, ApiError> {
    let mut tr = pool
        .begin()
        .await
        .map_err(|_| QueryError::new("Could not start transaction".to_owned()))?;

    sqlx::query(
        "DELETE FROM ingredients WHERE recipe_id IN (SELECT id FROM recipes WHERE category_id = $1)",
    )
    .bind(id)
    .execute(&mut *tr)
    .await
    .map_err(QueryError::from)?;

    sqlx::query("DELETE FROM recipes WHERE category_id = $1")
        .bind(id)
        .execute(&mut *tr)
        .await
        .map_err(QueryError::from)?;

    let result = sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(id)
        .execute(&mut *tr)
        .await
        .map_err(QueryError::from)?;

    if result.rows_affected() == 0 {
        // nothing was there to cascade from
        tr.rollback()
            .await
            .map_err(|_| QueryError::new("Could not roll back transaction".to_owned()))?;
        return Ok(false);
    }

    tr.commit()
        .await
        .map_err(|_| QueryError::new("Could not commit transaction".to_owned()))?;

    log::info!("> Deleted category {id}");

    Ok(true)
}

pub async fn list_category_recipes(
    category_id: Id,
    pool: &Pool<Sqlite>,
) -> Result<Vec<Recipe>, ApiError> {
    let rows: Vec<Recipe> =
        sqlx::query_as("SELECT * FROM recipes WHERE category_id = $1 ORDER BY id")
            .bind(category_id)
            .fetch_all(pool)
            .await
            .map_err(QueryError::from)?;

    Ok(rows)
}

/// The category with its recipes and their ingredients.
pub async fn category_view(category: Category, pool: &Pool<Sqlite>) -> Result<CategoryView, ApiError> {
    let recipes = list_category_recipes(category.id, pool).await?;
    let recipes = recipe_views(recipes, pool).await?;

    Ok(CategoryView {
        category,
        recipes: Some(recipes),
    })
}

/// Every category; recipes are only loaded when `expand` is set.
pub async fn list_category_views(
    expand: bool,
    pool: &Pool<Sqlite>,
) -> Result<Vec<CategoryView>, ApiError> {
    let categories = list_categories(pool).await?;

    if !expand {
        return Ok(categories
            .into_iter()
            .map(|category| CategoryView {
                category,
                recipes: None,
            })
            .collect());
    }

    let recipes: Vec<Recipe> = sqlx::query_as("SELECT * FROM recipes ORDER BY id")
        .fetch_all(pool)
        .await
        .map_err(QueryError::from)?;
    let mut grouped =
        group_recipe_views(recipe_views(recipes, pool).await?, |recipe| Some(recipe.category_id));

    Ok(categories
        .into_iter()
        .map(|category| CategoryView {
            recipes: Some(grouped.remove(&category.id).unwrap_or_default()),
            category,
        })
        .collect())
}
