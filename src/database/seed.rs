use std::collections::HashMap;

use sqlx::{Pool, Sqlite};

use crate::{
    constants::{SEED_CATEGORIES, SEED_INGREDIENTS, SEED_RECIPES},
    error::{ApiError, HtmlError, QueryError},
    schema::Id,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub categories: usize,
    pub recipes: usize,
    pub ingredients: usize,
}

/// Wipes every table and inserts the fixed sample catalog, all or nothing.
pub async fn seed_database(pool: &Pool<Sqlite>) -> Result<SeedSummary, ApiError> {
    let mut tr = pool
        .begin()
        .await
        .map_err(|_| QueryError::new("Could not start transaction".to_owned()))?;

    for table in ["ingredients", "recipes", "categories", "users"] {
        let result = sqlx::query(&format!("DELETE FROM {table}"))
            .execute(&mut *tr)
            .await
            .map_err(QueryError::from)?;

        log::trace!("> Cleared {} rows from {table}", result.rows_affected());
    }

    let mut summary = SeedSummary::default();

    let mut categories: HashMap<&str, Id> = HashMap::new();
    for name in SEED_CATEGORIES {
        let id: (Id,) = sqlx::query_as("INSERT INTO categories (name) VALUES ($1) RETURNING id")
            .bind(*name)
            .fetch_one(&mut *tr)
            .await
            .map_err(QueryError::from)?;

        categories.insert(*name, id.0);
        summary.categories += 1;
    }

    let mut recipes: HashMap<&str, Id> = HashMap::new();
    for (name, description, category) in SEED_RECIPES {
        let category_id = categories
            .get(category)
            .ok_or_else(|| HtmlError::InternalServerError.new("Seed recipe has unknown category"))?;

        let id: (Id,) = sqlx::query_as(
            "INSERT INTO recipes (name, description, category_id) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(*name)
        .bind(*description)
        .bind(*category_id)
        .fetch_one(&mut *tr)
        .await
        .map_err(QueryError::from)?;

        recipes.insert(*name, id.0);
        summary.recipes += 1;
    }

    for (name, quantity, recipe) in SEED_INGREDIENTS {
        let recipe_id = recipes
            .get(recipe)
            .ok_or_else(|| HtmlError::InternalServerError.new("Seed ingredient has unknown recipe"))?;

        sqlx::query("INSERT INTO ingredients (name, quantity, recipe_id) VALUES ($1, $2, $3)")
            .bind(*name)
            .bind(*quantity)
            .bind(*recipe_id)
            .execute(&mut *tr)
            .await
            .map_err(QueryError::from)?;

        summary.ingredients += 1;
    }

    tr.commit()
        .await
        .map_err(|_| QueryError::new("Could not commit transaction".to_owned()))?;

    Ok(summary)
}
