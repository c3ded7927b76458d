//! Core domain logic for the alumnos service.
//! This crate is the single source of truth for record invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, LogTarget};
pub use model::alumno::{parse_alumno_id, Alumno, AlumnoId, NewAlumno};
pub use model::validation::{
    validate_alumno, AlumnoCandidate, AlumnoValidationError, ValidationMode,
};
pub use repo::alumno_repo::{AlumnoRepository, RepoError, RepoResult, SqliteAlumnoRepository};
pub use service::alumno_service::{AlumnoService, AlumnoServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
