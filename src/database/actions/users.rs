use sqlx::{Pool, Sqlite};

use crate::{
    authentication::cryptography::hash_password,
    error::{ApiError, HtmlError, QueryError},
    schema::{Id, Recipe, User, UserView},
};

use super::{group_recipe_views, recipe_views};

/// Runs argon2 on the blocking pool.
async fn hash(password: String) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| {
            log::error!("> Password hashing task failed: {e}");
            HtmlError::InternalServerError.new("Failed to hash password")
        })?
        .map_err(|e| {
            log::error!("> Failed to hash password: {e}");
            HtmlError::InternalServerError.new("Failed to hash password")
        })
}

pub async fn list_users(pool: &Pool<Sqlite>) -> Result<Vec<User>, ApiError> {
    let rows: Vec<User> = sqlx::query_as("SELECT * FROM users ORDER BY id")
        .fetch_all(pool)
        .await
        .map_err(QueryError::from)?;

    Ok(rows)
}

pub async fn get_user(id: Id, pool: &Pool<Sqlite>) -> Result<Option<User>, ApiError> {
    let row: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(QueryError::from)?;

    Ok(row)
}

/// Creates a user with username and password, which is stored as its argon2 hash
pub async fn create_user(
    username: &str,
    password: String,
    pool: &Pool<Sqlite>,
) -> Result<User, ApiError> {
    let password = hash(password).await?;

    let row: Option<User> = sqlx::query_as(
        "
        INSERT INTO users (username, password)
        VALUES ($1, $2)
        ON CONFLICT DO NOTHING RETURNING *;
    ",
    )
    .bind(username)
    .bind(password)
    .fetch_optional(pool)
    .await
    .map_err(QueryError::from)?;

    match row {
        Some(user) => {
            log::info!("> Created user {} ({})", user.id, user.username);
            Ok(user)
        }
        None => Err(HtmlError::Conflict.new("Username is already taken")),
    }
}

pub async fn update_user(
    id: Id,
    username: Option<String>,
    password: Option<String>,
    pool: &Pool<Sqlite>,
) -> Result<Option<User>, ApiError> {
    let password = match password {
        Some(password) => Some(hash(password).await?),
        None => None,
    };

    let row: Option<User> = sqlx::query_as(
        "
        UPDATE users SET
        username = COALESCE($1, username),
        password = COALESCE($2, password)
        WHERE id = $3
        RETURNING *
    ",
    )
    .bind(username)
    .bind(password)
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(QueryError::from)?;

    Ok(row)
}

/// Deletes the user with its recipes and their ingredients.
pub async fn delete_user(id: Id, pool: &Pool<Sqlite>) -> Result<bool, ApiError> {
    let mut tr = pool
        .begin()
        .await
        .map_err(|_| QueryError::new("Could not start transaction".to_owned()))?;

    sqlx::query(
        "DELETE FROM ingredients WHERE recipe_id IN (SELECT id FROM recipes WHERE user_id = $1)",
    )
    .bind(id)
    .execute(&mut *tr)
    .await
    .map_err(QueryError::from)?;

    sqlx::query("DELETE FROM recipes WHERE user_id = $1")
        .bind(id)
        .execute(&mut *tr)
        .await
        .map_err(QueryError::from)?;

    let result = sqlx::query("DELETE FROM users WHERE id = $1")
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

    log::info!("> Deleted user {id}");

    Ok(true)
}

pub async fn user_view(user: User, pool: &Pool<Sqlite>) -> Result<UserView, ApiError> {
    let recipes: Vec<Recipe> = sqlx::query_as("SELECT * FROM recipes WHERE user_id = $1 ORDER BY id")
        .bind(user.id)
        .fetch_all(pool)
        .await
        .map_err(QueryError::from)?;

    Ok(UserView {
        user,
        recipes: Some(recipe_views(recipes, pool).await?),
    })
}

pub async fn list_user_views(expand: bool, pool: &Pool<Sqlite>) -> Result<Vec<UserView>, ApiError> {
    let users = list_users(pool).await?;

    if !expand {
        return Ok(users
            .into_iter()
            .map(|user| UserView {
                user,
                recipes: None,
            })
            .collect());
    }

    let recipes: Vec<Recipe> =
        sqlx::query_as("SELECT * FROM recipes WHERE user_id IS NOT NULL ORDER BY id")
            .fetch_all(pool)
            .await
            .map_err(QueryError::from)?;
    let mut grouped = group_recipe_views(recipe_views(recipes, pool).await?, |recipe| recipe.user_id);

    Ok(users
        .into_iter()
        .map(|user| UserView {
            recipes: Some(grouped.remove(&user.id).unwrap_or_default()),
            user,
        })
        .collect())
}
