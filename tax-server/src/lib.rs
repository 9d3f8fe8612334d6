pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod routes;
pub mod schemas;
pub mod shutdown;

pub use app::{AppState, build_registry};
pub use auth::AdminCredentials;
pub use config::ServerConfig;
pub use routes::routes;
