//! Listener bootstrap and serve loop.

use crate::config::{ConfigError, ServerConfig};
use crate::routes::router;
use crate::state::AppState;
use alumnos_core::db::DbError;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::future::Future;
use tokio::net::TcpListener;

/// Fatal startup or serve failure.
#[derive(Debug)]
pub enum ServerError {
    Config(ConfigError),
    Db(DbError),
    Io(std::io::Error),
}

impl Display for ServerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "invalid configuration: {err}"),
            Self::Db(err) => write!(f, "failed to open store: {err}"),
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<ConfigError> for ServerError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<DbError> for ServerError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<std::io::Error> for ServerError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Opens the store, binds the listener and serves until Ctrl-C.
pub async fn run(config: &ServerConfig) -> Result<(), ServerError> {
    config.validate()?;
    let addr = config.socket_addr()?;
    let conn = config.open_store()?;

    let listener = TcpListener::bind(addr).await?;
    info!(
        "event=server_start module=http status=ok addr={} db_path={}",
        listener.local_addr()?,
        config.db_path
    );

    serve(listener, AppState::new(conn), shutdown_signal()).await
}

/// Serves the API on an already-bound listener until `shutdown` resolves.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), ServerError> {
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("event=server_stop module=http status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("event=server_stop module=http status=error error=ctrl_c_unavailable detail={err}");
        std::future::pending::<()>().await;
    }
}
