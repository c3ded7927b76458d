//! Field validation for student candidates.
//!
//! # Responsibility
//! - Map untyped JSON input to an ordered list of violation messages.
//! - Convert accepted candidates into typed records.
//!
//! # Invariants
//! - Every check runs; violations are reported in field order, not
//!   short-circuited on the first failure.
//! - Validation has no side effects and is deterministic.

use crate::model::alumno::{Alumno, NewAlumno};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const MSG_ID_REQUIRED: &str = "El ID es requerido para actualización";
pub const MSG_ID_NOT_NUMERIC: &str = "El ID debe ser un número";
pub const MSG_NOMBRE: &str = "El nombre debe tener al menos 3 caracteres";
pub const MSG_APELLIDO: &str = "El apellido debe tener al menos 3 caracteres";
pub const MSG_ID_CURSO: &str = "El ID del curso debe ser un número válido";
pub const MSG_FECHA_NACIMIENTO: &str = "La fecha de nacimiento debe ser válida";
pub const MSG_HACE_DEPORTES: &str = "El campo hace_deportes debe ser 0 o 1";

const MIN_NAME_CHARS: usize = 3;

/// Which write path a candidate is validated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    Create,
    /// Additionally requires a non-empty `id`.
    Update,
}

/// Rejection raised when a candidate or typed record is not acceptable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlumnoValidationError {
    /// One or more field checks failed, in check order.
    Violations(Vec<String>),
    /// `id` was present but is not an integer.
    InvalidId,
}

impl AlumnoValidationError {
    /// Returns the human-readable messages carried by this error.
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Violations(messages) => messages.clone(),
            Self::InvalidId => vec![MSG_ID_NOT_NUMERIC.to_string()],
        }
    }
}

impl Display for AlumnoValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Violations(messages) => write!(f, "{}", messages.join("; ")),
            Self::InvalidId => write!(f, "{MSG_ID_NOT_NUMERIC}"),
        }
    }
}

impl Error for AlumnoValidationError {}

/// Untyped student input as received from a request body.
///
/// Any JSON value is accepted; non-object input behaves like an empty
/// object so every field check reports.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlumnoCandidate {
    fields: Map<String, Value>,
}

impl AlumnoCandidate {
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self { fields },
            _ => Self::default(),
        }
    }

    fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name).filter(|value| !value.is_null())
    }

    /// Runs all field checks for `mode`; empty output means acceptable.
    pub fn validate(&self, mode: ValidationMode) -> Vec<String> {
        validate_alumno(self, mode)
    }

    /// Validates for create and builds the typed insert payload.
    pub fn to_new_alumno(&self) -> Result<NewAlumno, AlumnoValidationError> {
        let violations = self.validate(ValidationMode::Create);
        if !violations.is_empty() {
            return Err(AlumnoValidationError::Violations(violations));
        }
        self.typed_fields()
    }

    /// Validates for update and builds the typed full-row record.
    ///
    /// # Errors
    /// - `Violations` when any field check fails.
    /// - `InvalidId` when `id` is present but not an integer.
    pub fn to_alumno(&self) -> Result<Alumno, AlumnoValidationError> {
        let violations = self.validate(ValidationMode::Update);
        if !violations.is_empty() {
            return Err(AlumnoValidationError::Violations(violations));
        }
        let id = self
            .field("id")
            .and_then(integer_value)
            .ok_or(AlumnoValidationError::InvalidId)?;
        Ok(self.typed_fields()?.with_id(id))
    }

    fn typed_fields(&self) -> Result<NewAlumno, AlumnoValidationError> {
        // Callers validate first; `None` here means checks and conversions drifted.
        let consistency = || {
            AlumnoValidationError::Violations(vec![
                "candidate passed validation but could not be converted".to_string(),
            ])
        };
        Ok(NewAlumno {
            nombre: self.name_field("nombre").ok_or_else(consistency)?,
            apellido: self.name_field("apellido").ok_or_else(consistency)?,
            id_curso: self
                .field("id_curso")
                .and_then(course_id)
                .ok_or_else(consistency)?,
            fecha_nacimiento: self
                .field("fecha_nacimiento")
                .and_then(Value::as_str)
                .and_then(parse_birth_date)
                .ok_or_else(consistency)?,
            hace_deportes: self
                .field("hace_deportes")
                .and_then(sports_flag)
                .ok_or_else(consistency)?,
        })
    }

    fn name_field(&self, name: &str) -> Option<String> {
        self.field(name)
            .and_then(Value::as_str)
            .filter(|value| has_min_chars(value))
            .map(str::to_string)
    }
}

/// Computes the ordered violation list for `candidate`.
pub fn validate_alumno(candidate: &AlumnoCandidate, mode: ValidationMode) -> Vec<String> {
    let mut errors = Vec::new();

    if mode == ValidationMode::Update && !candidate.field("id").is_some_and(is_present_id) {
        errors.push(MSG_ID_REQUIRED.to_string());
    }

    if candidate.name_field("nombre").is_none() {
        errors.push(MSG_NOMBRE.to_string());
    }

    if candidate.name_field("apellido").is_none() {
        errors.push(MSG_APELLIDO.to_string());
    }

    if candidate.field("id_curso").and_then(course_id).is_none() {
        errors.push(MSG_ID_CURSO.to_string());
    }

    let birth_date = candidate
        .field("fecha_nacimiento")
        .and_then(Value::as_str)
        .and_then(parse_birth_date);
    if birth_date.is_none() {
        errors.push(MSG_FECHA_NACIMIENTO.to_string());
    }

    if candidate.field("hace_deportes").and_then(sports_flag).is_none() {
        errors.push(MSG_HACE_DEPORTES.to_string());
    }

    errors
}

/// Re-checks typed write payloads before they reach SQL.
pub fn validate_new_alumno(alumno: &NewAlumno) -> Result<(), AlumnoValidationError> {
    let mut errors = Vec::new();
    if !has_min_chars(&alumno.nombre) {
        errors.push(MSG_NOMBRE.to_string());
    }
    if !has_min_chars(&alumno.apellido) {
        errors.push(MSG_APELLIDO.to_string());
    }
    if alumno.id_curso == 0 {
        errors.push(MSG_ID_CURSO.to_string());
    }
    if alumno.hace_deportes > 1 {
        errors.push(MSG_HACE_DEPORTES.to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AlumnoValidationError::Violations(errors))
    }
}

/// Typed counterpart of [`validate_new_alumno`] for full records.
pub fn validate_record(alumno: &Alumno) -> Result<(), AlumnoValidationError> {
    validate_new_alumno(&NewAlumno {
        nombre: alumno.nombre.clone(),
        apellido: alumno.apellido.clone(),
        id_curso: alumno.id_curso,
        fecha_nacimiento: alumno.fecha_nacimiento,
        hace_deportes: alumno.hace_deportes,
    })
}

/// Parses the accepted birth date shapes into a calendar date.
///
/// Accepts `YYYY-MM-DD`, naive `YYYY-MM-DDTHH:MM:SS[.fff]` and RFC 3339.
pub fn parse_birth_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(datetime.date());
        }
    }
    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|datetime| datetime.date_naive())
}

fn has_min_chars(value: &str) -> bool {
    value.chars().count() >= MIN_NAME_CHARS
}

fn is_present_id(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Integer from a JSON number with no fractional part, or a numeric string.
fn integer_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|n| n.fract() == 0.0 && *n >= i64::MIN as f64 && *n < i64::MAX as f64)
                .map(|n| n as i64)
        }),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Zero is never a course reference; it counts as missing.
fn course_id(value: &Value) -> Option<i64> {
    integer_value(value).filter(|id| *id != 0)
}

/// Strict `0|1` flag; booleans and strings are not flags.
fn sports_flag(value: &Value) -> Option<u8> {
    match value.as_f64() {
        Some(n) if n == 0.0 => Some(0),
        Some(n) if n == 1.0 => Some(1),
        _ => None,
    }
}
