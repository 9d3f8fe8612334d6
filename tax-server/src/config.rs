use std::fmt;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;
use tax_core::db::DbConfig;

/// Progressive income tax HTTP service.
///
/// Every option can also be supplied through the environment variable named
/// in its help text.
#[derive(Clone, Parser)]
#[command(name = "tax-server")]
#[command(version, about, long_about = None)]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Database connection string. For SQLite this is a `sqlite:` URL or a
    /// file path.
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:tax.db?mode=rwc")]
    pub database_url: String,

    /// Storage backend (`sqlite` or `memory`).
    #[arg(long, env = "DB_BACKEND", default_value = "sqlite")]
    pub db_backend: String,

    /// User name accepted on `/admin` routes.
    #[arg(long, env = "ADMIN_USERNAME")]
    pub admin_username: String,

    /// Password accepted on `/admin` routes.
    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
    pub admin_password: String,

    /// Also write logs to this file.
    #[arg(long, env = "LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Log filter directive applied after startup, e.g. `debug`.
    #[arg(long, env = "LOG_LEVEL")]
    pub log_level: Option<String>,
}

impl ServerConfig {
    pub fn db_config(&self) -> DbConfig {
        DbConfig {
            backend: self.db_backend.clone(),
            connection_string: self.database_url.clone(),
        }
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("port", &self.port)
            .field("database_url", &self.database_url)
            .field("db_backend", &self.db_backend)
            .field("admin_username", &self.admin_username)
            .field("admin_password", &"<redacted>")
            .field("log_file", &self.log_file)
            .field("log_level", &self.log_level)
            .finish()
    }
}
