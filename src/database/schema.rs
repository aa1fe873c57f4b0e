use serde::{Deserialize, Serialize};

pub type Id = i64;

#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: Id,
    pub name: String,
}

#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recipe {
    pub id: Id,
    pub name: String,
    pub description: Option<String>,
    pub category_id: Id,
    pub user_id: Option<Id>,
}

#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ingredient {
    pub id: Id,
    pub name: String,
    pub quantity: String,
    pub recipe_id: Id,
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct User {
    pub id: Id,
    pub username: String,
    /// argon2 hash
    #[serde(skip_serializing)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecipeView {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub ingredients: Vec<Ingredient>,
}

/// `recipes` is left out of the JSON when it wasn't loaded.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryView {
    #[serde(flatten)]
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipes: Option<Vec<RecipeView>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    #[serde(flatten)]
    pub user: User,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipes: Option<Vec<RecipeView>>,
}

#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub expand: bool,
}

#[derive(Debug, Clone)]
pub struct NewRecipe {
    pub name: String,
    pub description: Option<String>,
    pub category_id: Id,
    pub user_id: Option<Id>,
}

#[derive(Debug, Clone, Default)]
pub struct RecipeChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<Id>,
    pub user_id: Option<Id>,
}

#[derive(Debug, Clone)]
pub struct NewIngredient {
    pub name: String,
    pub quantity: String,
    pub recipe_id: Id,
}

#[derive(Debug, Clone, Default)]
pub struct IngredientChanges {
    pub name: Option<String>,
    pub quantity: Option<String>,
    pub recipe_id: Option<Id>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn recipe_view_is_flat_with_ingredients() {
        let view = RecipeView {
            recipe: Recipe {
                id: 1,
                name: String::from("Cake"),
                description: None,
                category_id: 2,
                user_id: None,
            },
            ingredients: vec![],
        };

        assert_eq!(
            serde_json::to_value(view).unwrap(),
            json!({
                "id": 1,
                "name": "Cake",
                "description": null,
                "category_id": 2,
                "user_id": null,
                "ingredients": [],
            })
        );
    }

    #[test]
    fn unloaded_recipes_are_omitted() {
        let view = CategoryView {
            category: Category {
                id: 1,
                name: String::from("Dessert"),
            },
            recipes: None,
        };

        assert_eq!(
            serde_json::to_value(view).unwrap(),
            json!({ "id": 1, "name": "Dessert" })
        );
    }

    #[test]
    fn password_is_never_serialized() {
        let view = UserView {
            user: User {
                id: 1,
                username: String::from("chef"),
                password: String::from("$argon2id$..."),
            },
            recipes: Some(vec![]),
        };

        let value = serde_json::to_value(view).unwrap();
        assert!(value.get("password").is_none());
        assert_eq!(value["recipes"], json!([]));
    }
}
