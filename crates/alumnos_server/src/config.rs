//! Server configuration.
//!
//! # Responsibility
//! - Parse CLI flags with environment fallbacks.
//! - Resolve the listen address, log settings and store location.
//!
//! # Invariants
//! - A config that passed `validate()` always yields a bindable address.

use alumnos_core::db::{open_db, open_db_in_memory, DbResult};
use alumnos_core::default_log_level;
use clap::Parser;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::net::{SocketAddr, ToSocketAddrs};

/// Store location that opens a private in-memory database.
pub const IN_MEMORY_DB: &str = ":memory:";

/// Runtime configuration for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "alumnos_server", version, about = "REST API over the alumnos table")]
pub struct ServerConfig {
    /// Interface to bind.
    #[arg(long, env = "ALUMNOS_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// TCP port to bind.
    #[arg(long, env = "ALUMNOS_PORT", default_value_t = 3000)]
    pub port: u16,

    /// SQLite database file, or `:memory:`.
    #[arg(long, env = "ALUMNOS_DB_PATH", default_value = "alumnos.sqlite3")]
    pub db_path: String,

    /// trace|debug|info|warn|error. Defaults by build mode.
    #[arg(long, env = "ALUMNOS_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files. Logs to stderr when unset.
    #[arg(long, env = "ALUMNOS_LOG_DIR")]
    pub log_dir: Option<String>,
}

/// Rejected configuration values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyHost,
    ZeroPort,
    EmptyDbPath,
    UnresolvableAddress(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyHost => write!(f, "host cannot be empty"),
            Self::ZeroPort => write!(f, "port must be between 1 and 65535"),
            Self::EmptyDbPath => write!(f, "db_path cannot be empty"),
            Self::UnresolvableAddress(addr) => write!(f, "cannot resolve listen address `{addr}`"),
        }
    }
}

impl Error for ConfigError {}

impl ServerConfig {
    /// Checks values clap cannot express as types.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        if self.port == 0 {
            return Err(ConfigError::ZeroPort);
        }
        if self.db_path.trim().is_empty() {
            return Err(ConfigError::EmptyDbPath);
        }
        Ok(())
    }

    /// Resolves `host:port` to the first matching socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host.trim(), self.port);
        addr.to_socket_addrs()
            .ok()
            .and_then(|mut addrs| addrs.next())
            .ok_or(ConfigError::UnresolvableAddress(addr))
    }

    /// Effective log level.
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(default_log_level())
    }

    /// Opens the configured store with the schema applied.
    pub fn open_store(&self) -> DbResult<Connection> {
        match self.db_path.trim() {
            IN_MEMORY_DB => open_db_in_memory(),
            path => open_db(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, ServerConfig};
    use alumnos_core::db::schema::{table_exists, ALUMNOS_TABLE};
    use clap::Parser;
    use tempfile::TempDir;

    fn parse(args: &[&str]) -> ServerConfig {
        let mut argv = vec!["alumnos_server"];
        argv.extend_from_slice(args);
        ServerConfig::try_parse_from(argv).expect("args should parse")
    }

    #[test]
    fn flags_override_defaults() {
        let config = parse(&["--port", "8080", "--db-path", ":memory:", "--log-level", "warn"]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.db_path, ":memory:");
        assert_eq!(config.log_level(), "warn");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_port_and_blank_host() {
        let config = parse(&["--port", "0"]);
        assert_eq!(config.validate(), Err(ConfigError::ZeroPort));

        let config = parse(&["--host", " "]);
        assert_eq!(config.validate(), Err(ConfigError::EmptyHost));
    }

    #[test]
    fn socket_addr_resolves_loopback() {
        let config = parse(&["--host", "127.0.0.1", "--port", "3001"]);
        let addr = config.socket_addr().expect("loopback should resolve");
        assert_eq!(addr.port(), 3001);
        assert!(addr.ip().is_loopback());
    }

    #[test]
    fn in_memory_store_opens_with_schema() {
        let config = parse(&["--db-path", ":memory:"]);
        let conn = config.open_store().expect("memory store should open");
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM alumnos;", [], |row| row.get(0))
            .expect("alumnos table should exist");
        assert_eq!(count, 0);
    }

    #[test]
    fn file_store_is_created_and_persists_across_opens() {
        let dir = TempDir::new().expect("temp dir");
        let db_path = dir.path().join("alumnos.sqlite3");
        let db_arg = db_path.to_string_lossy().to_string();
        let config = parse(&["--db-path", &db_arg]);

        {
            let conn = config.open_store().expect("file store should open");
            assert!(table_exists(&conn, ALUMNOS_TABLE).expect("schema lookup"));
            conn.execute(
                "INSERT INTO alumnos (nombre, apellido, id_curso, fecha_nacimiento, hace_deportes)
                 VALUES ('Ana', 'Lopez', 2, '2001-05-01', 1);",
                [],
            )
            .expect("insert should succeed");
        }
        assert!(db_path.exists());

        let reopened = config.open_store().expect("file store should reopen");
        let count: i64 = reopened
            .query_row("SELECT COUNT(*) FROM alumnos;", [], |row| row.get(0))
            .expect("count query");
        assert_eq!(count, 1);
    }
}
