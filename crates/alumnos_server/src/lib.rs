//! HTTP surface for the alumnos service.
//! Routes map directly onto `alumnos_core` service operations.

pub mod config;
pub mod error;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::ApiError;
pub use routes::router;
pub use server::{run, serve, ServerError};
pub use state::AppState;
