//! Repository layer: the record store gateway.
//!
//! # Responsibility
//! - Define the data access contract for student rows.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes re-check typed records before persistence.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod alumno_repo;
