//! Person record model.
//!
//! # Responsibility
//! - Define `PersonaRecord` as returned by `GET BASE`.
//! - Provide role and sex lookups used by the edit form.
//!
//! # Invariants
//! - `id` is immutable once assigned by the server.
//! - Empty strings and `null` decode to "absent", never to `Some("")`.
//! - `id` and `id_rol` accept JSON numbers and numeric strings.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt::{Display, Formatter};

static LEADING_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d{4}-\d{2}-\d{2})").expect("valid leading date regex"));

/// Server-assigned record identifier.
pub type PersonaId = i64;

/// School role of a person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Role code `1`.
    Estudiante,
    /// Role code `2`.
    Profesor,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Estudiante, Role::Profesor];

    /// Integer code expected by the backend in `id_rol`.
    pub fn code(self) -> i64 {
        match self {
            Self::Estudiante => 1,
            Self::Profesor => 2,
        }
    }

    /// Maps the numeric `id_rol`; unknown codes give `None`.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Estudiante),
            2 => Some(Self::Profesor),
            _ => None,
        }
    }

    /// Matches the display label case-insensitively.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "estudiante" => Some(Self::Estudiante),
            "profesor" => Some(Self::Profesor),
            _ => None,
        }
    }

    /// Display label as served in `rol`.
    pub fn label(self) -> &'static str {
        match self {
            Self::Estudiante => "Estudiante",
            Self::Profesor => "Profesor",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Sex selection offered by the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sex {
    M,
    F,
}

impl Sex {
    pub const ALL: [Sex; 2] = [Sex::M, Sex::F];

    /// Parses `m`/`M`/`f`/`F`, ignoring surrounding whitespace.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "M" => Some(Self::M),
            "F" => Some(Self::F),
            _ => None,
        }
    }

    /// Control value sent to the backend.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::M => "M",
            Self::F => "F",
        }
    }
}

impl Display for Sex {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One person as served by the collection endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PersonaRecord {
    #[serde(deserialize_with = "de_id")]
    pub id: PersonaId,
    #[serde(default, deserialize_with = "de_text")]
    pub nombre: String,
    #[serde(default, deserialize_with = "de_text")]
    pub apellido: String,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub sexo: Option<String>,
    /// Raw value from the server; may be a date or a full timestamp.
    #[serde(default, deserialize_with = "de_opt_text")]
    pub fh_nac: Option<String>,
    /// Display label, e.g. `Profesor`.
    #[serde(default, deserialize_with = "de_opt_text")]
    pub rol: Option<String>,
    #[serde(default, deserialize_with = "de_opt_int")]
    pub id_rol: Option<i64>,
}

impl PersonaRecord {
    /// Creates a record with required fields only.
    pub fn new(id: PersonaId, nombre: impl Into<String>, apellido: impl Into<String>) -> Self {
        Self {
            id,
            nombre: nombre.into(),
            apellido: apellido.into(),
            sexo: None,
            fh_nac: None,
            rol: None,
            id_rol: None,
        }
    }

    /// `"<nombre> <apellido>"`, used by the delete confirmation.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.nombre, self.apellido)
    }

    /// Resolves the role, preferring `id_rol` and falling back to `rol`.
    ///
    /// A zero or missing `id_rol` counts as absent. An unknown code does not
    /// fall back to the label.
    pub fn role(&self) -> Option<Role> {
        match self.id_rol.filter(|code| *code != 0) {
            Some(code) => Role::from_code(code),
            None => self.rol.as_deref().and_then(Role::from_label),
        }
    }

    /// Parsed `sexo`, if it is `M` or `F` in any case.
    pub fn sex(&self) -> Option<Sex> {
        self.sexo.as_deref().and_then(Sex::parse)
    }

    /// Birth date as a calendar date, when the server value starts with one.
    pub fn birth_date(&self) -> Option<NaiveDate> {
        self.fh_nac.as_deref().and_then(parse_birth_date)
    }
}

/// Extracts the leading `YYYY-MM-DD` of a date or timestamp string.
pub fn parse_birth_date(raw: &str) -> Option<NaiveDate> {
    let caps = LEADING_DATE_RE.captures(raw)?;
    NaiveDate::parse_from_str(caps.get(1)?.as_str(), "%Y-%m-%d").ok()
}

fn value_to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|float| float.fract() == 0.0)
                .map(|float| float as i64)
        }),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn value_to_text(value: Value) -> Option<String> {
    match value {
        Value::String(text) if text.trim().is_empty() => None,
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn de_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<PersonaId, D::Error> {
    let value = Value::deserialize(deserializer)?;
    value_to_i64(&value).ok_or_else(|| D::Error::custom(format!("invalid persona id: {value}")))
}

fn de_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(value_to_text(Value::deserialize(deserializer)?).unwrap_or_default())
}

fn de_opt_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(value_to_text(Value::deserialize(deserializer)?))
}

fn de_opt_int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    Ok(value_to_i64(&Value::deserialize(deserializer)?))
}
