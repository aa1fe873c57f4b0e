use tracing_subscriber::{fmt, EnvFilter};

/// Installs the console subscriber. `log` records from the library are
/// forwarded into it, so `RUST_LOG` filters both.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if let Err(e) = fmt().with_env_filter(filter).try_init() {
        eprintln!("Logging already initialized: {e}");
    }
}
