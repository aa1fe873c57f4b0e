mod database {
    pub mod actions;
    pub mod connection;
    pub mod error;
    pub mod form;
    pub mod schema;
    pub mod seed;
}
mod authentication {
    pub mod cryptography;
}
mod server {
    pub mod filters;
    pub mod handlers;
    pub mod rejection;
    pub mod serve;
}
mod config;
mod constants;
mod logging;

pub use authentication::*;
pub use config::*;
pub use constants::*;
pub use database::*;
pub use logging::*;
pub use server::*;
pub use server::serve::start_server;
