use recipe_catalog::{connection::connect, error::ServerError, init_logging, seed::seed_database, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = Config::load()?;
    let pool = connect(&config.database_url, 1).await?;

    let summary = seed_database(&pool).await.map_err(ServerError::Seed)?;
    log::info!(
        "Inserted {} categories, {} recipes, {} ingredients",
        summary.categories,
        summary.recipes,
        summary.ingredients
    );

    pool.close().await;
    log::info!("Seeding done!");

    Ok(())
}
