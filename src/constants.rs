pub const DEFAULT_DATABASE_URL: &str = "sqlite://app.db";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

pub const SERVICE_BANNER: &str = "Recipe Restaurant Backend";

/// SQLite's bound parameter limit is 32766; stay well below it.
pub const MAX_BIND_PARAMETERS: usize = 500;

pub const SEED_CATEGORIES: &[&str] = &["Appetizer", "Main Course", "Dessert"];

/// (name, description, category)
pub const SEED_RECIPES: &[(&str, &str, &str)] = &[
    (
        "Bruschetta",
        "A delicious appetizer with tomatoes, garlic, and basil.",
        "Appetizer",
    ),
    (
        "Pizza Margherita",
        "A classic pizza with mozzarella, tomatoes, and basil.",
        "Main Course",
    ),
    (
        "Tiramisu",
        "A famous Italian dessert with coffee, mascarpone cheese, and cocoa.",
        "Dessert",
    ),
];

/// (name, quantity, recipe)
pub const SEED_INGREDIENTS: &[(&str, &str, &str)] = &[
    ("Tomatoes", "5", "Bruschetta"),
    ("Garlic", "2 cloves", "Bruschetta"),
    ("Mozzarella", "200g", "Pizza Margherita"),
    ("Mascarpone", "250g", "Tiramisu"),
];
