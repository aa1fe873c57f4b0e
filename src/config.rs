use std::{
    env,
    fmt::Display,
    net::{IpAddr, SocketAddr},
    str::FromStr,
};

use crate::{
    constants::{DEFAULT_DATABASE_URL, DEFAULT_HOST, DEFAULT_MAX_CONNECTIONS, DEFAULT_PORT},
    error::ServerError,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub host: IpAddr,
    pub port: u16,
    pub max_connections: u32,
}

impl Config {
    /// Reads `.env` when present, then the process environment.
    pub fn load() -> Result<Self, ServerError> {
        if let Err(e) = dotenv::dotenv() {
            log::trace!("> No .env loaded: {e}");
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ServerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            database_url: try_load(&lookup, "DATABASE_URL", DEFAULT_DATABASE_URL)?,
            host: try_load(&lookup, "HOST", DEFAULT_HOST)?,
            port: try_load(&lookup, "PORT", &DEFAULT_PORT.to_string())?,
            max_connections: try_load(
                &lookup,
                "DATABASE_MAX_CONNECTIONS",
                &DEFAULT_MAX_CONNECTIONS.to_string(),
            )?,
        })
    }

    pub fn address(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn try_load<F, T>(lookup: &F, key: &str, default: &str) -> Result<T, ServerError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    let value = lookup(key).unwrap_or_else(|| {
        log::info!("{key} not set, using default: {default}");
        default.to_string()
    });

    value
        .parse()
        .map_err(|e| ServerError::Config(format!("Invalid {key} value {value:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.port, 5000);
        assert_eq!(config.address().to_string(), "127.0.0.1:5000");
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
    }

    #[test]
    fn overrides() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "sqlite://other.db"),
            ("HOST", "0.0.0.0"),
            ("PORT", "8080"),
        ]))
        .unwrap();

        assert_eq!(config.database_url, "sqlite://other.db");
        assert_eq!(config.address().to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn invalid_port_is_an_error() {
        let error = Config::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();

        assert!(matches!(error, ServerError::Config(_)));
        assert!(error.to_string().contains("PORT"));
    }
}
