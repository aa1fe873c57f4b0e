use std::{
    sync::atomic::{AtomicBool, Ordering},
    time::{Duration, Instant},
};

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use recipe_catalog::{
    actions,
    connection::connect_in_memory,
    cryptography::hash_password,
    error::{ApiError, QueryError},
    schema::{Id, IngredientChanges, NewIngredient, NewRecipe, RecipeChanges},
    seed::{seed_database, SeedSummary},
    MAX_BIND_PARAMETERS,
};
use sqlx::{Pool, Sqlite};

fn password_matches(password: &str, stored: &str) -> bool {
    let parsed = PasswordHash::new(stored).unwrap();
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

async fn count(table: &str, pool: &Pool<Sqlite>) -> i64 {
    let row: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap();

    row.0
}

async fn recipe_in(category_id: Id, name: &str, pool: &Pool<Sqlite>) -> Id {
    actions::create_recipe(
        NewRecipe {
            name: name.to_string(),
            description: None,
            category_id,
            user_id: None,
        },
        pool,
    )
    .await
    .unwrap()
    .id
}

async fn ingredient_in(recipe_id: Id, name: &str, pool: &Pool<Sqlite>) -> Id {
    actions::create_ingredient(
        NewIngredient {
            name: name.to_string(),
            quantity: String::from("1"),
            recipe_id,
        },
        pool,
    )
    .await
    .unwrap()
    .id
}

#[tokio::test]
async fn deleting_a_category_removes_its_recipes_and_ingredients() {
    let pool = connect_in_memory().await.unwrap();

    let dessert = actions::create_category("Dessert", &pool).await.unwrap().id;
    let soup = actions::create_category("Soup", &pool).await.unwrap().id;

    let cake = recipe_in(dessert, "Cake", &pool).await;
    let pie = recipe_in(dessert, "Pie", &pool).await;
    let broth = recipe_in(soup, "Broth", &pool).await;
    ingredient_in(cake, "Flour", &pool).await;
    ingredient_in(pie, "Apples", &pool).await;
    ingredient_in(broth, "Bones", &pool).await;

    assert!(actions::delete_category(dessert, &pool).await.unwrap());

    assert_eq!(count("categories", &pool).await, 1);
    assert_eq!(count("recipes", &pool).await, 1);
    assert_eq!(count("ingredients", &pool).await, 1);
    assert!(actions::get_recipe(broth, &pool).await.unwrap().is_some());

    assert!(!actions::delete_category(dessert, &pool).await.unwrap());
}

#[tokio::test]
async fn deleting_a_recipe_only_touches_its_ingredients() {
    let pool = connect_in_memory().await.unwrap();

    let dessert = actions::create_category("Dessert", &pool).await.unwrap().id;
    let cake = recipe_in(dessert, "Cake", &pool).await;
    let pie = recipe_in(dessert, "Pie", &pool).await;
    ingredient_in(cake, "Flour", &pool).await;
    ingredient_in(cake, "Eggs", &pool).await;
    let apples = ingredient_in(pie, "Apples", &pool).await;

    assert!(actions::delete_recipe(cake, &pool).await.unwrap());

    let remaining = actions::list_ingredients(&pool).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, apples);
    assert!(actions::get_category(dessert, &pool).await.unwrap().is_some());
}

#[tokio::test]
async fn partial_updates_keep_unset_fields() {
    let pool = connect_in_memory().await.unwrap();

    let dessert = actions::create_category("Dessert", &pool).await.unwrap().id;
    let bakery = actions::create_category("Bakery", &pool).await.unwrap().id;
    let cake = recipe_in(dessert, "Cake", &pool).await;
    let flour = ingredient_in(cake, "Flour", &pool).await;

    let recipe = actions::update_recipe(
        cake,
        RecipeChanges {
            category_id: Some(bakery),
            ..Default::default()
        },
        &pool,
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(recipe.name, "Cake");
    assert_eq!(recipe.category_id, bakery);

    let ingredient = actions::update_ingredient(
        flour,
        IngredientChanges {
            quantity: Some(String::from("500g")),
            ..Default::default()
        },
        &pool,
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(ingredient.name, "Flour");
    assert_eq!(ingredient.quantity, "500g");
    assert_eq!(ingredient.recipe_id, cake);

    let missing = actions::update_ingredient(999, IngredientChanges::default(), &pool)
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn moving_to_missing_parents_is_rejected() {
    let pool = connect_in_memory().await.unwrap();

    let dessert = actions::create_category("Dessert", &pool).await.unwrap().id;
    let cake = recipe_in(dessert, "Cake", &pool).await;
    let flour = ingredient_in(cake, "Flour", &pool).await;

    let error = actions::update_recipe(
        cake,
        RecipeChanges {
            category_id: Some(404),
            ..Default::default()
        },
        &pool,
    )
    .await
    .unwrap_err();
    assert_eq!(error.code, 400);

    let error = actions::update_ingredient(
        flour,
        IngredientChanges {
            recipe_id: Some(404),
            ..Default::default()
        },
        &pool,
    )
    .await
    .unwrap_err();
    assert_eq!(error.code, 400);
}

#[tokio::test]
async fn foreign_keys_are_enforced_below_the_actions() {
    let pool = connect_in_memory().await.unwrap();

    let error = sqlx::query("INSERT INTO recipes (name, category_id) VALUES ('Orphan', 12)")
        .execute(&pool)
        .await
        .unwrap_err();

    let error: ApiError = QueryError::from(error).into();
    assert_eq!(error.code, 400);
    assert_eq!(count("recipes", &pool).await, 0);
}

#[tokio::test]
async fn passwords_are_stored_hashed() {
    let pool = connect_in_memory().await.unwrap();

    let user = actions::create_user("chef", String::from("secret"), &pool)
        .await
        .unwrap();
    assert!(user.password.starts_with("$argon2"));
    assert!(password_matches("secret", &user.password));

    let user = actions::update_user(user.id, None, Some(String::from("changed")), &pool)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.username, "chef");
    assert!(password_matches("changed", &user.password));
    assert!(!password_matches("secret", &user.password));
}

#[tokio::test]
async fn hashing_does_not_stall_other_tasks() {
    let pool = connect_in_memory().await.unwrap();

    let started = Instant::now();
    hash_password("baseline").unwrap();
    let one_hash = started.elapsed();

    let done = AtomicBool::new(false);
    let work = async {
        for name in ["ann", "bob", "cid"] {
            actions::create_user(name, String::from("secret"), &pool)
                .await
                .unwrap();
        }
        done.store(true, Ordering::Relaxed);
    };
    let heartbeat = async {
        let mut max_gap = Duration::ZERO;
        while !done.load(Ordering::Relaxed) {
            let tick = Instant::now();
            tokio::time::sleep(Duration::from_millis(1)).await;
            max_gap = max_gap.max(tick.elapsed());
        }
        max_gap
    };

    let ((), max_gap) = tokio::join!(work, heartbeat);

    assert!(
        max_gap < one_hash / 2,
        "heartbeat stalled for {max_gap:?}, one hash takes {one_hash:?}"
    );
}

#[tokio::test]
async fn ingredient_lookup_spans_many_recipes() {
    let pool = connect_in_memory().await.unwrap();

    let dessert = actions::create_category("Dessert", &pool).await.unwrap().id;
    let cake = recipe_in(dessert, "Cake", &pool).await;
    ingredient_in(cake, "Flour", &pool).await;

    // ids past the first chunk are looked up too
    let mut ids: Vec<Id> = (10_000..10_000 + MAX_BIND_PARAMETERS as Id * 2).collect();
    ids.push(cake);

    let ingredients = actions::list_ingredients_for_recipes(&ids, &pool).await.unwrap();
    assert_eq!(ingredients.len(), 1);
    assert!(actions::list_ingredients_for_recipes(&[], &pool)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn seeding_replaces_everything() {
    let pool = connect_in_memory().await.unwrap();

    actions::create_category("Leftovers", &pool).await.unwrap();
    actions::create_user("chef", String::from("secret"), &pool)
        .await
        .unwrap();

    let summary = seed_database(&pool).await.unwrap();
    assert_eq!(
        summary,
        SeedSummary {
            categories: 3,
            recipes: 3,
            ingredients: 4,
        }
    );

    // running it again yields the same catalog
    seed_database(&pool).await.unwrap();
    assert_eq!(count("categories", &pool).await, 3);
    assert_eq!(count("recipes", &pool).await, 3);
    assert_eq!(count("ingredients", &pool).await, 4);
    assert_eq!(count("users", &pool).await, 0);

    let recipes = actions::list_recipe_views(&pool).await.unwrap();
    let bruschetta = recipes
        .iter()
        .find(|view| view.recipe.name == "Bruschetta")
        .unwrap();
    let names: Vec<&str> = bruschetta
        .ingredients
        .iter()
        .map(|ingredient| ingredient.name.as_str())
        .collect();
    assert_eq!(names, vec!["Tomatoes", "Garlic"]);
}
