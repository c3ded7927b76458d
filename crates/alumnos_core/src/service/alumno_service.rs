//! Student use-case service.
//!
//! # Responsibility
//! - Turn raw caller input (path ids, JSON candidates) into repository calls.
//! - Classify every failure into the service error taxonomy.
//!
//! # Invariants
//! - Malformed ids are rejected before any query runs.
//! - Candidates are validated before any write; partial records never merge.
//! - Service layer remains storage-agnostic.

use crate::model::alumno::{parse_alumno_id, Alumno, AlumnoId};
use crate::model::validation::{AlumnoCandidate, AlumnoValidationError, MSG_ID_NOT_NUMERIC};
use crate::repo::alumno_repo::{AlumnoRepository, RepoError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const MSG_NOT_FOUND: &str = "Alumno no encontrado";
pub const MSG_DELETED: &str = "Alumno eliminado correctamente";

pub type ServiceResult<T> = Result<T, AlumnoServiceError>;

/// Service error for student use-cases.
#[derive(Debug)]
pub enum AlumnoServiceError {
    /// Malformed identifier input.
    InvalidInput(String),
    /// One or more field checks failed, in check order.
    ValidationFailed(Vec<String>),
    /// No row matches the id.
    NotFound(AlumnoId),
    /// Any persistence-layer failure.
    Store(RepoError),
}

impl Display for AlumnoServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(message) => write!(f, "{message}"),
            Self::ValidationFailed(messages) => write!(f, "{}", messages.join("; ")),
            Self::NotFound(_) => write!(f, "{MSG_NOT_FOUND}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AlumnoServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for AlumnoServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            RepoError::Validation(err) => Self::from(err),
            other => Self::Store(other),
        }
    }
}

impl From<AlumnoValidationError> for AlumnoServiceError {
    fn from(value: AlumnoValidationError) -> Self {
        match value {
            AlumnoValidationError::InvalidId => Self::InvalidInput(MSG_ID_NOT_NUMERIC.to_string()),
            AlumnoValidationError::Violations(messages) => Self::ValidationFailed(messages),
        }
    }
}

/// Student service facade over repository implementations.
pub struct AlumnoService<R: AlumnoRepository> {
    repo: R,
}

impl<R: AlumnoRepository> AlumnoService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists every stored student.
    pub fn list_alumnos(&self) -> ServiceResult<Vec<Alumno>> {
        let alumnos = self.repo.list_alumnos()?;
        info!(
            "event=alumno_list module=service status=ok count={}",
            alumnos.len()
        );
        Ok(alumnos)
    }

    /// Gets one student by raw path id.
    pub fn get_alumno(&self, raw_id: &str) -> ServiceResult<Alumno> {
        let id = parse_id(raw_id)?;
        self.repo
            .get_alumno(id)?
            .ok_or(AlumnoServiceError::NotFound(id))
    }

    /// Validates a create candidate and persists it.
    ///
    /// Returns the stored record including the assigned id.
    pub fn create_alumno(&self, candidate: &AlumnoCandidate) -> ServiceResult<Alumno> {
        let new_alumno = candidate.to_new_alumno().inspect_err(|err| {
            warn!(
                "event=alumno_create module=service status=rejected reason=validation count={}",
                err.messages().len()
            );
        })?;
        let created = self.repo.create_alumno(&new_alumno)?;
        info!(
            "event=alumno_create module=service status=ok id={}",
            created.id
        );
        Ok(created)
    }

    /// Validates a full-row candidate and replaces the stored row.
    ///
    /// # Contract
    /// - Candidate must carry an existing integer `id`.
    /// - All mutable fields are replaced; absent fields are violations.
    pub fn update_alumno(&self, candidate: &AlumnoCandidate) -> ServiceResult<Alumno> {
        let alumno = candidate.to_alumno().inspect_err(|err| {
            warn!(
                "event=alumno_update module=service status=rejected reason=validation count={}",
                err.messages().len()
            );
        })?;
        let updated = self.repo.update_alumno(&alumno).inspect_err(|err| {
            if matches!(err, RepoError::NotFound(_)) {
                info!(
                    "event=alumno_update module=service status=not_found id={}",
                    alumno.id
                );
            }
        })?;
        info!(
            "event=alumno_update module=service status=ok id={}",
            updated.id
        );
        Ok(updated)
    }

    /// Deletes one student by raw path id, returning the removed id.
    pub fn delete_alumno(&self, raw_id: &str) -> ServiceResult<AlumnoId> {
        let id = parse_id(raw_id)?;
        self.repo.delete_alumno(id)?;
        info!("event=alumno_delete module=service status=ok id={id}");
        Ok(id)
    }
}

fn parse_id(raw_id: &str) -> ServiceResult<AlumnoId> {
    parse_alumno_id(raw_id)
        .ok_or_else(|| AlumnoServiceError::InvalidInput(MSG_ID_NOT_NUMERIC.to_string()))
}
