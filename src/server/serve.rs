use tokio::signal::ctrl_c;
#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

use crate::{config::Config, connection::connect, error::ServerError};

use super::filters::routes;

/// Connects to the database and serves the API until Ctrl+C or SIGTERM.
pub async fn start_server(config: Config) -> Result<(), ServerError> {
    log::info!("Initializing database...");
    let pool = connect(&config.database_url, config.max_connections).await?;

    let (address, server) = warp::serve(routes(pool.clone()))
        .try_bind_with_graceful_shutdown(config.address(), shutdown_signal())?;

    log::info!("Server running on {address}");
    server.await;

    log::info!("Server shutting down...");
    pool.close().await;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => log::info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                log::error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                log::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                log::error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
