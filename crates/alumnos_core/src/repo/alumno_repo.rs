//! Student repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `alumnos` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Every statement binds user values as parameters; no value is ever
//!   formatted into SQL text.
//! - Write paths re-check typed records before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Update and delete check existence first; the check and the write are
//!   separate statements and are not atomic against concurrent writers.

use crate::db::schema::{table_exists, ALUMNOS_TABLE};
use crate::db::DbError;
use crate::model::alumno::{Alumno, AlumnoId, NewAlumno};
use crate::model::validation::{validate_new_alumno, validate_record, AlumnoValidationError};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const ALUMNO_COLUMNS: &str = "id, nombre, apellido, id_curso, fecha_nacimiento, hace_deportes";
const DATE_FORMAT: &str = "%Y-%m-%d";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for student persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(AlumnoValidationError),
    Db(DbError),
    NotFound(AlumnoId),
    InvalidData(String),
    /// The connection was handed over without the `alumnos` table.
    UninitializedStorage,
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "alumno not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted alumno data: {message}"),
            Self::UninitializedStorage => {
                write!(f, "storage not initialized: table `{ALUMNOS_TABLE}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) | Self::UninitializedStorage => None,
        }
    }
}

impl From<AlumnoValidationError> for RepoError {
    fn from(value: AlumnoValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for student CRUD operations.
pub trait AlumnoRepository {
    /// Returns every row, ordered by id.
    fn list_alumnos(&self) -> RepoResult<Vec<Alumno>>;
    fn get_alumno(&self, id: AlumnoId) -> RepoResult<Option<Alumno>>;
    /// Inserts the five mutable fields and returns the stored row.
    fn create_alumno(&self, alumno: &NewAlumno) -> RepoResult<Alumno>;
    /// Replaces the full row keyed by `alumno.id`.
    fn update_alumno(&self, alumno: &Alumno) -> RepoResult<Alumno>;
    fn delete_alumno(&self, id: AlumnoId) -> RepoResult<()>;
}

/// SQLite-backed student repository.
pub struct SqliteAlumnoRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAlumnoRepository<'conn> {
    /// Wraps a bootstrapped connection without checking the schema.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Wraps a connection after confirming the `alumnos` table exists.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        if !table_exists(conn, ALUMNOS_TABLE)? {
            return Err(RepoError::UninitializedStorage);
        }
        Ok(Self::new(conn))
    }
}

impl AlumnoRepository for SqliteAlumnoRepository<'_> {
    fn list_alumnos(&self) -> RepoResult<Vec<Alumno>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {ALUMNO_COLUMNS} FROM alumnos ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut alumnos = Vec::new();

        while let Some(row) = rows.next()? {
            alumnos.push(parse_alumno_row(row)?);
        }

        Ok(alumnos)
    }

    fn get_alumno(&self, id: AlumnoId) -> RepoResult<Option<Alumno>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {ALUMNO_COLUMNS} FROM alumnos WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_alumno_row(row)?));
        }

        Ok(None)
    }

    fn create_alumno(&self, alumno: &NewAlumno) -> RepoResult<Alumno> {
        validate_new_alumno(alumno)?;

        let mut stmt = self.conn.prepare(&format!(
            "INSERT INTO alumnos (
                nombre,
                apellido,
                id_curso,
                fecha_nacimiento,
                hace_deportes
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING {ALUMNO_COLUMNS};"
        ))?;

        let mut rows = stmt.query(params![
            alumno.nombre.as_str(),
            alumno.apellido.as_str(),
            alumno.id_curso,
            date_to_db(alumno.fecha_nacimiento),
            alumno.hace_deportes,
        ])?;

        let created = match rows.next()? {
            Some(row) => parse_alumno_row(row)?,
            None => {
                return Err(RepoError::InvalidData(
                    "insert returned no row".to_string(),
                ));
            }
        };

        Ok(created)
    }

    fn update_alumno(&self, alumno: &Alumno) -> RepoResult<Alumno> {
        validate_record(alumno)?;

        if self.get_alumno(alumno.id)?.is_none() {
            return Err(RepoError::NotFound(alumno.id));
        }

        let updated = self
            .conn
            .query_row(
                &format!(
                    "UPDATE alumnos
                     SET
                        nombre = ?1,
                        apellido = ?2,
                        id_curso = ?3,
                        fecha_nacimiento = ?4,
                        hace_deportes = ?5
                     WHERE id = ?6
                     RETURNING {ALUMNO_COLUMNS};"
                ),
                params![
                    alumno.nombre.as_str(),
                    alumno.apellido.as_str(),
                    alumno.id_curso,
                    date_to_db(alumno.fecha_nacimiento),
                    alumno.hace_deportes,
                    alumno.id,
                ],
                read_raw_row,
            )
            .optional()?;

        match updated {
            Some(raw) => raw.into_alumno(),
            // Row removed between the existence check and the update.
            None => Err(RepoError::NotFound(alumno.id)),
        }
    }

    fn delete_alumno(&self, id: AlumnoId) -> RepoResult<()> {
        if self.get_alumno(id)?.is_none() {
            return Err(RepoError::NotFound(id));
        }

        let changed = self
            .conn
            .execute("DELETE FROM alumnos WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

/// Column values as stored, before domain checks.
struct RawAlumnoRow {
    id: AlumnoId,
    nombre: String,
    apellido: String,
    id_curso: i64,
    fecha_nacimiento: String,
    hace_deportes: i64,
}

impl RawAlumnoRow {
    fn into_alumno(self) -> RepoResult<Alumno> {
        let fecha_nacimiento = NaiveDate::parse_from_str(&self.fecha_nacimiento, DATE_FORMAT)
            .map_err(|_| {
                RepoError::InvalidData(format!(
                    "invalid date `{}` in alumnos.fecha_nacimiento",
                    self.fecha_nacimiento
                ))
            })?;

        let hace_deportes = match self.hace_deportes {
            0 => 0,
            1 => 1,
            other => {
                return Err(RepoError::InvalidData(format!(
                    "invalid hace_deportes value `{other}` in alumnos.hace_deportes"
                )));
            }
        };

        let alumno = Alumno {
            id: self.id,
            nombre: self.nombre,
            apellido: self.apellido,
            id_curso: self.id_curso,
            fecha_nacimiento,
            hace_deportes,
        };
        validate_record(&alumno)
            .map_err(|err| RepoError::InvalidData(format!("row {}: {err}", alumno.id)))?;
        Ok(alumno)
    }
}

fn read_raw_row(row: &Row<'_>) -> rusqlite::Result<RawAlumnoRow> {
    Ok(RawAlumnoRow {
        id: row.get("id")?,
        nombre: row.get("nombre")?,
        apellido: row.get("apellido")?,
        id_curso: row.get("id_curso")?,
        fecha_nacimiento: row.get("fecha_nacimiento")?,
        hace_deportes: row.get("hace_deportes")?,
    })
}

fn parse_alumno_row(row: &Row<'_>) -> RepoResult<Alumno> {
    read_raw_row(row)?.into_alumno()
}

fn date_to_db(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
