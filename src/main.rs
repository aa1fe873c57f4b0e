use recipe_catalog::{init_logging, start_server, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = Config::load()?;
    start_server(config).await?;

    Ok(())
}
