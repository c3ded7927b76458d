//! Alumno (student) domain model.
//!
//! # Responsibility
//! - Define the canonical student record persisted in the `alumnos` table.
//! - Parse raw path identifiers into typed ids.
//!
//! # Invariants
//! - `id` is assigned by the store on insert and never changes.
//! - `hace_deportes` is always `0` or `1`.
//! - `fecha_nacimiento` is a calendar date, serialized as `YYYY-MM-DD`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Store-assigned integer identifier for a student row.
pub type AlumnoId = i64;

/// Persisted student record, as returned by every read path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alumno {
    pub id: AlumnoId,
    pub nombre: String,
    pub apellido: String,
    /// Course reference. Not enforced against any other table.
    pub id_curso: i64,
    pub fecha_nacimiento: NaiveDate,
    /// Integer flag kept as `0|1` on the wire to match the table column.
    pub hace_deportes: u8,
}

/// Student fields without identity, used by the create path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAlumno {
    pub nombre: String,
    pub apellido: String,
    pub id_curso: i64,
    pub fecha_nacimiento: NaiveDate,
    pub hace_deportes: u8,
}

impl NewAlumno {
    /// Attaches a store-assigned id, producing a full record.
    pub fn with_id(self, id: AlumnoId) -> Alumno {
        Alumno {
            id,
            nombre: self.nombre,
            apellido: self.apellido,
            id_curso: self.id_curso,
            fecha_nacimiento: self.fecha_nacimiento,
            hace_deportes: self.hace_deportes,
        }
    }
}

/// Parses a raw path segment into an [`AlumnoId`].
///
/// Surrounding whitespace is ignored; anything else that is not a base-10
/// integer yields `None`.
pub fn parse_alumno_id(raw: &str) -> Option<AlumnoId> {
    raw.trim().parse::<AlumnoId>().ok()
}
