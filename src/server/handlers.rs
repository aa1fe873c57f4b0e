use sqlx::{Pool, Sqlite};
use warp::{http::StatusCode, reject::Rejection, Reply};

use crate::{
    actions,
    error::{ApiError, HtmlError},
    form::{Form, FormData},
    schema::{Id, IngredientChanges, ListQuery, NewIngredient, NewRecipe, RecipeChanges},
};

fn not_found(entity: &str) -> impl FnOnce() -> ApiError + '_ {
    move || HtmlError::NotFound.new(&format!("{entity} not found"))
}

fn created<T: serde::Serialize>(value: &T) -> impl Reply {
    warp::reply::with_status(warp::reply::json(value), StatusCode::CREATED)
}

fn deleted(found: bool, entity: &str) -> Result<StatusCode, Rejection> {
    if found {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(entity)().into())
    }
}

// Categories

pub async fn list_categories(query: ListQuery, pool: Pool<Sqlite>) -> Result<impl Reply, Rejection> {
    let views = actions::list_category_views(query.expand, &pool).await?;

    Ok(warp::reply::json(&views))
}

pub async fn create_category(data: FormData, pool: Pool<Sqlite>) -> Result<impl Reply, Rejection> {
    let form = Form::from_data(data);
    let name = form.get_str("name")?;

    let category = actions::create_category(&name, &pool).await?;
    let view = actions::category_view(category, &pool).await?;

    Ok(created(&view))
}

pub async fn get_category(id: Id, pool: Pool<Sqlite>) -> Result<impl Reply, Rejection> {
    let category = actions::get_category(id, &pool)
        .await?
        .ok_or_else(not_found("Category"))?;
    let view = actions::category_view(category, &pool).await?;

    Ok(warp::reply::json(&view))
}

pub async fn update_category(
    id: Id,
    data: FormData,
    pool: Pool<Sqlite>,
) -> Result<impl Reply, Rejection> {
    let form = Form::from_data(data);
    let name = form.get_optional_str("name")?;

    let category = actions::update_category(id, name, &pool)
        .await?
        .ok_or_else(not_found("Category"))?;
    let view = actions::category_view(category, &pool).await?;

    Ok(warp::reply::json(&view))
}

pub async fn delete_category(id: Id, pool: Pool<Sqlite>) -> Result<impl Reply, Rejection> {
    deleted(actions::delete_category(id, &pool).await?, "Category")
}

// Recipes

pub async fn list_recipes(pool: Pool<Sqlite>) -> Result<impl Reply, Rejection> {
    let views = actions::list_recipe_views(&pool).await?;

    Ok(warp::reply::json(&views))
}

pub async fn create_recipe(data: FormData, pool: Pool<Sqlite>) -> Result<impl Reply, Rejection> {
    let form = Form::from_data(data);
    let recipe = NewRecipe {
        name: form.get_str("name")?,
        description: form.get_optional_str("description")?,
        category_id: form.get_id("category_id")?,
        user_id: form.get_optional_id("user_id")?,
    };

    let recipe = actions::create_recipe(recipe, &pool).await?;
    let view = actions::recipe_view(recipe, &pool).await?;

    Ok(created(&view))
}

pub async fn get_recipe(id: Id, pool: Pool<Sqlite>) -> Result<impl Reply, Rejection> {
    let recipe = actions::get_recipe(id, &pool)
        .await?
        .ok_or_else(not_found("Recipe"))?;
    let view = actions::recipe_view(recipe, &pool).await?;

    Ok(warp::reply::json(&view))
}

pub async fn update_recipe(
    id: Id,
    data: FormData,
    pool: Pool<Sqlite>,
) -> Result<impl Reply, Rejection> {
    let form = Form::from_data(data);
    let changes = RecipeChanges {
        name: form.get_optional_str("name")?,
        description: form.get_optional_str("description")?,
        category_id: form.get_optional_id("category_id")?,
        user_id: form.get_optional_id("user_id")?,
    };

    let recipe = actions::update_recipe(id, changes, &pool)
        .await?
        .ok_or_else(not_found("Recipe"))?;
    let view = actions::recipe_view(recipe, &pool).await?;

    Ok(warp::reply::json(&view))
}

pub async fn delete_recipe(id: Id, pool: Pool<Sqlite>) -> Result<impl Reply, Rejection> {
    deleted(actions::delete_recipe(id, &pool).await?, "Recipe")
}

// Ingredients

pub async fn list_ingredients(pool: Pool<Sqlite>) -> Result<impl Reply, Rejection> {
    let ingredients = actions::list_ingredients(&pool).await?;

    Ok(warp::reply::json(&ingredients))
}

pub async fn create_ingredient(data: FormData, pool: Pool<Sqlite>) -> Result<impl Reply, Rejection> {
    let form = Form::from_data(data);
    let ingredient = NewIngredient {
        name: form.get_str("name")?,
        quantity: form.get_quantity("quantity")?,
        recipe_id: form.get_id("recipe_id")?,
    };

    let ingredient = actions::create_ingredient(ingredient, &pool).await?;

    Ok(created(&ingredient))
}

pub async fn get_ingredient(id: Id, pool: Pool<Sqlite>) -> Result<impl Reply, Rejection> {
    let ingredient = actions::get_ingredient(id, &pool)
        .await?
        .ok_or_else(not_found("Ingredient"))?;

    Ok(warp::reply::json(&ingredient))
}

pub async fn update_ingredient(
    id: Id,
    data: FormData,
    pool: Pool<Sqlite>,
) -> Result<impl Reply, Rejection> {
    let form = Form::from_data(data);
    let changes = IngredientChanges {
        name: form.get_optional_str("name")?,
        quantity: form.get_optional_quantity("quantity")?,
        recipe_id: form.get_optional_id("recipe_id")?,
    };

    let ingredient = actions::update_ingredient(id, changes, &pool)
        .await?
        .ok_or_else(not_found("Ingredient"))?;

    Ok(warp::reply::json(&ingredient))
}

pub async fn delete_ingredient(id: Id, pool: Pool<Sqlite>) -> Result<impl Reply, Rejection> {
    deleted(actions::delete_ingredient(id, &pool).await?, "Ingredient")
}

// Users

pub async fn list_users(query: ListQuery, pool: Pool<Sqlite>) -> Result<impl Reply, Rejection> {
    let views = actions::list_user_views(query.expand, &pool).await?;

    Ok(warp::reply::json(&views))
}

pub async fn create_user(data: FormData, pool: Pool<Sqlite>) -> Result<impl Reply, Rejection> {
    let form = Form::from_data(data);
    let username = form.get_str("username")?;
    let password = form.get_str("password")?;

    let user = actions::create_user(&username, password, &pool).await?;
    let view = actions::user_view(user, &pool).await?;

    Ok(created(&view))
}

pub async fn get_user(id: Id, pool: Pool<Sqlite>) -> Result<impl Reply, Rejection> {
    let user = actions::get_user(id, &pool)
        .await?
        .ok_or_else(not_found("User"))?;
    let view = actions::user_view(user, &pool).await?;

    Ok(warp::reply::json(&view))
}

pub async fn update_user(id: Id, data: FormData, pool: Pool<Sqlite>) -> Result<impl Reply, Rejection> {
    let form = Form::from_data(data);
    let username = form.get_optional_str("username")?;
    let password = form.get_optional_str("password")?;

    let user = actions::update_user(id, username, password, &pool)
        .await?
        .ok_or_else(not_found("User"))?;
    let view = actions::user_view(user, &pool).await?;

    Ok(warp::reply::json(&view))
}

pub async fn delete_user(id: Id, pool: Pool<Sqlite>) -> Result<impl Reply, Rejection> {
    deleted(actions::delete_user(id, &pool).await?, "User")
}
