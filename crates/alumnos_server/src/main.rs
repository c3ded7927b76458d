//! Server entry point.
//!
//! # Responsibility
//! - Parse configuration, start logging, run the HTTP server.
//! - Convert fatal errors into a non-zero exit code.

use alumnos_server::{run, ServerConfig};
use clap::Parser;
use log::error;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let config = ServerConfig::parse();

    if let Err(err) = alumnos_core::init_logging(config.log_level(), config.log_dir.as_deref()) {
        eprintln!("failed to initialize logging: {err}");
        return ExitCode::FAILURE;
    }

    match run(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=server_exit module=http status=error error={err}");
            eprintln!("alumnos_server: {err}");
            ExitCode::FAILURE
        }
    }
}
