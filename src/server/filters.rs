use std::convert::Infallible;

use serde_json::json;
use sqlx::{Pool, Sqlite};
use warp::{reject::Rejection, Filter, Reply};

use crate::{
    constants::SERVICE_BANNER,
    form::FormData,
    schema::{Id, ListQuery},
};

use super::{handlers, rejection::handle_rejection};

/// Upper bound for any JSON request body.
const MAX_BODY_BYTES: u64 = 16 * 1024;

pub fn with_pool(
    pool: Pool<Sqlite>,
) -> impl Filter<Extract = (Pool<Sqlite>,), Error = Infallible> + Clone {
    warp::any().map(move || pool.clone())
}

pub fn json_body() -> impl Filter<Extract = (FormData,), Error = Rejection> + Clone {
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::json())
}

/// The full service: every entity's routes, error recovery, CORS and
/// request logging.
pub fn routes(pool: Pool<Sqlite>) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let cors = warp::cors()
        .allow_any_origin()
        .allow_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allow_header("content-type");

    index()
        .or(categories(pool.clone()))
        .or(recipes(pool.clone()))
        .or(ingredients(pool.clone()))
        .or(users(pool))
        .recover(handle_rejection)
        .with(cors)
        .with(warp::log("recipe_catalog::api"))
}

pub fn index() -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path::end()
        .and(warp::get())
        .map(|| warp::reply::json(&json!({ "message": SERVICE_BANNER })))
}

pub fn categories(
    pool: Pool<Sqlite>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let base = warp::path("categories");

    let list = base
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<ListQuery>())
        .and(with_pool(pool.clone()))
        .and_then(handlers::list_categories);

    let create = base
        .and(warp::path::end())
        .and(warp::post())
        .and(json_body())
        .and(with_pool(pool.clone()))
        .and_then(handlers::create_category);

    let fetch = base
        .and(warp::path::param::<Id>())
        .and(warp::path::end())
        .and(warp::get())
        .and(with_pool(pool.clone()))
        .and_then(handlers::get_category);

    let update = base
        .and(warp::path::param::<Id>())
        .and(warp::path::end())
        .and(warp::put())
        .and(json_body())
        .and(with_pool(pool.clone()))
        .and_then(handlers::update_category);

    let delete = base
        .and(warp::path::param::<Id>())
        .and(warp::path::end())
        .and(warp::delete())
        .and(with_pool(pool))
        .and_then(handlers::delete_category);

    list.or(create).or(fetch).or(update).or(delete)
}

pub fn recipes(pool: Pool<Sqlite>) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let base = warp::path("recipes");

    let list = base
        .and(warp::path::end())
        .and(warp::get())
        .and(with_pool(pool.clone()))
        .and_then(handlers::list_recipes);

    let create = base
        .and(warp::path::end())
        .and(warp::post())
        .and(json_body())
        .and(with_pool(pool.clone()))
        .and_then(handlers::create_recipe);

    let fetch = base
        .and(warp::path::param::<Id>())
        .and(warp::path::end())
        .and(warp::get())
        .and(with_pool(pool.clone()))
        .and_then(handlers::get_recipe);

    let update = base
        .and(warp::path::param::<Id>())
        .and(warp::path::end())
        .and(warp::put())
        .and(json_body())
        .and(with_pool(pool.clone()))
        .and_then(handlers::update_recipe);

    let delete = base
        .and(warp::path::param::<Id>())
        .and(warp::path::end())
        .and(warp::delete())
        .and(with_pool(pool))
        .and_then(handlers::delete_recipe);

    list.or(create).or(fetch).or(update).or(delete)
}

pub fn ingredients(
    pool: Pool<Sqlite>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let base = warp::path("ingredients");

    let list = base
        .and(warp::path::end())
        .and(warp::get())
        .and(with_pool(pool.clone()))
        .and_then(handlers::list_ingredients);

    let create = base
        .and(warp::path::end())
        .and(warp::post())
        .and(json_body())
        .and(with_pool(pool.clone()))
        .and_then(handlers::create_ingredient);

    let fetch = base
        .and(warp::path::param::<Id>())
        .and(warp::path::end())
        .and(warp::get())
        .and(with_pool(pool.clone()))
        .and_then(handlers::get_ingredient);

    let update = base
        .and(warp::path::param::<Id>())
        .and(warp::path::end())
        .and(warp::put())
        .and(json_body())
        .and(with_pool(pool.clone()))
        .and_then(handlers::update_ingredient);

    let delete = base
        .and(warp::path::param::<Id>())
        .and(warp::path::end())
        .and(warp::delete())
        .and(with_pool(pool))
        .and_then(handlers::delete_ingredient);

    list.or(create).or(fetch).or(update).or(delete)
}

pub fn users(pool: Pool<Sqlite>) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let base = warp::path("users");

    let list = base
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<ListQuery>())
        .and(with_pool(pool.clone()))
        .and_then(handlers::list_users);

    let create = base
        .and(warp::path::end())
        .and(warp::post())
        .and(json_body())
        .and(with_pool(pool.clone()))
        .and_then(handlers::create_user);

    let fetch = base
        .and(warp::path::param::<Id>())
        .and(warp::path::end())
        .and(warp::get())
        .and(with_pool(pool.clone()))
        .and_then(handlers::get_user);

    let update = base
        .and(warp::path::param::<Id>())
        .and(warp::path::end())
        .and(warp::put())
        .and(json_body())
        .and(with_pool(pool.clone()))
        .and_then(handlers::update_user);

    let delete = base
        .and(warp::path::param::<Id>())
        .and(warp::path::end())
        .and(warp::delete())
        .and(with_pool(pool))
        .and_then(handlers::delete_user);

    list.or(create).or(fetch).or(update).or(delete)
}
