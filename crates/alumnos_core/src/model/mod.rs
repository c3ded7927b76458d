//! Student domain model and input validation.
//!
//! # Responsibility
//! - Define the canonical `Alumno` record and its id type.
//! - Own the field checks every write path must pass.
//!
//! # Invariants
//! - Records are identified by a store-assigned integer `AlumnoId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod alumno;
pub mod validation;
