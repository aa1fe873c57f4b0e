use std::str::FromStr;

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};

use super::error::ServerError;

/// Opens the database file (creating it when missing) and brings the schema
/// up to date.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<Pool<Sqlite>, ServerError> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    log::info!("> Connected to {database_url}");

    migrate(&pool).await?;

    Ok(pool)
}

/// Private database living as long as the returned pool. Every connection
/// to `sqlite::memory:` is its own database, so the pool holds exactly one.
pub async fn connect_in_memory() -> Result<Pool<Sqlite>, ServerError> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    migrate(&pool).await?;

    Ok(pool)
}

pub async fn migrate(pool: &Pool<Sqlite>) -> Result<(), ServerError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    log::trace!("> Migrations applied");

    Ok(())
}
