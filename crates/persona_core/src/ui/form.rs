//! Create/edit dialog state.
//!
//! # Responsibility
//! - Hold the form fields, the hidden record id and the dialog chrome
//!   (title, inline alert, submit control).
//! - Validate input and build the request payload.
//!
//! # Invariants
//! - The hidden id is the only create-vs-update signal.
//! - Only `open_create`/`open_edit` change the hidden id.
//! - The inline alert is replaced, never stacked.

use crate::model::persona::{parse_birth_date, PersonaId, PersonaRecord, Role, Sex};
use crate::ui::notify::{AlertLevel, InlineAlert};
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const TITLE_CREATE: &str = "Registrar Nueva Persona";
pub const TITLE_EDIT: &str = "Editar Persona";
pub const SUBMIT_LABEL_IDLE: &str = "Guardar Cambios";
pub const SUBMIT_LABEL_BUSY: &str = "Guardando...";
pub const REQUIRED_FIELDS_MESSAGE: &str = "Por favor, completa todos los campos obligatorios.";

/// Client-side validation failure; never reaches the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValidationError {
    /// Names of the empty required fields.
    MissingFields(Vec<&'static str>),
    /// Birth date present but not a calendar date.
    InvalidBirthDate(String),
}

impl FormValidationError {
    /// Stable log code; never carries field values.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingFields(_) => "missing_fields",
            Self::InvalidBirthDate(_) => "invalid_birth_date",
        }
    }

    /// Text for the inline warning.
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingFields(_) => REQUIRED_FIELDS_MESSAGE.to_string(),
            Self::InvalidBirthDate(value) => {
                format!("Fecha de nacimiento inválida: `{value}` (se espera AAAA-MM-DD).")
            }
        }
    }
}

impl Display for FormValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingFields(fields) => {
                write!(f, "missing required fields: {}", fields.join(", "))
            }
            Self::InvalidBirthDate(value) => write!(f, "invalid birth date: `{value}`"),
        }
    }
}

impl Error for FormValidationError {}

/// Editable field values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonaForm {
    pub nombre: String,
    pub apellido: String,
    pub sexo: Option<Sex>,
    /// `YYYY-MM-DD` or empty.
    pub fh_nac: String,
    pub rol: Option<Role>,
}

impl PersonaForm {
    /// Populates every field from `record`.
    ///
    /// Role uses the code-then-label inference; a birth timestamp is cut to
    /// its date; an unparseable date leaves the field empty.
    pub fn from_record(record: &PersonaRecord) -> Self {
        Self {
            nombre: record.nombre.clone(),
            apellido: record.apellido.clone(),
            sexo: record.sex(),
            fh_nac: record
                .birth_date()
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            rol: record.role(),
        }
    }

    /// Checks required fields and the optional birth date.
    pub fn validate(&self) -> Result<(), FormValidationError> {
        let mut missing = Vec::new();
        if self.nombre.trim().is_empty() {
            missing.push("nombre");
        }
        if self.apellido.trim().is_empty() {
            missing.push("apellido");
        }
        if self.sexo.is_none() {
            missing.push("sexo");
        }
        if self.rol.is_none() {
            missing.push("id_rol");
        }
        if !missing.is_empty() {
            return Err(FormValidationError::MissingFields(missing));
        }

        // Only a bare date is accepted here; timestamps are for decoding.
        let fh_nac = self.fh_nac.trim();
        if !fh_nac.is_empty() && (fh_nac.len() != 10 || parse_birth_date(fh_nac).is_none()) {
            return Err(FormValidationError::InvalidBirthDate(fh_nac.to_string()));
        }
        Ok(())
    }

    /// JSON fields sent on create/update; `id_rol` is numeric and an empty
    /// birth date is omitted.
    pub fn to_payload(&self) -> Map<String, Value> {
        let mut payload = Map::new();
        payload.insert("nombre".to_string(), Value::from(self.nombre.trim()));
        payload.insert("apellido".to_string(), Value::from(self.apellido.trim()));
        if let Some(sexo) = self.sexo {
            payload.insert("sexo".to_string(), Value::from(sexo.as_str()));
        }
        let fh_nac = self.fh_nac.trim();
        if !fh_nac.is_empty() {
            payload.insert("fh_nac".to_string(), Value::from(fh_nac));
        }
        if let Some(rol) = self.rol {
            payload.insert("id_rol".to_string(), Value::from(rol.code()));
        }
        payload
    }
}

/// Modal dialog holding a `PersonaForm`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormDialog {
    form: PersonaForm,
    hidden_id: Option<PersonaId>,
    title: &'static str,
    open: bool,
    was_validated: bool,
    alert: Option<InlineAlert>,
    submitting: bool,
}

impl Default for FormDialog {
    fn default() -> Self {
        Self {
            form: PersonaForm::default(),
            hidden_id: None,
            title: TITLE_CREATE,
            open: false,
            was_validated: false,
            alert: None,
            submitting: false,
        }
    }
}

impl FormDialog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears everything and opens for a new record.
    pub fn open_create(&mut self) {
        self.reset();
        self.hidden_id = None;
        self.title = TITLE_CREATE;
        self.open = true;
    }

    /// Clears, fills from `record` and opens for update.
    pub fn open_edit(&mut self, record: &PersonaRecord) {
        self.reset();
        self.form = PersonaForm::from_record(record);
        self.hidden_id = Some(record.id);
        self.title = TITLE_EDIT;
        self.open = true;
    }

    /// Hides the dialog; field values and hidden id are kept.
    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn title(&self) -> &'static str {
        self.title
    }

    pub fn hidden_id(&self) -> Option<PersonaId> {
        self.hidden_id
    }

    pub fn is_update(&self) -> bool {
        self.hidden_id.is_some()
    }

    pub fn form(&self) -> &PersonaForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut PersonaForm {
        &mut self.form
    }

    pub fn alert(&self) -> Option<&InlineAlert> {
        self.alert.as_ref()
    }

    /// Replaces the inline alert.
    pub fn show_alert(&mut self, level: AlertLevel, message: impl Into<String>) {
        self.alert = Some(InlineAlert::new(level, message));
    }

    pub fn clear_alert(&mut self) {
        self.alert = None;
    }

    pub fn was_validated(&self) -> bool {
        self.was_validated
    }

    /// Runs validation and marks the form as validated either way.
    pub fn validate(&mut self) -> Result<(), FormValidationError> {
        self.was_validated = true;
        self.form.validate()
    }

    /// Disables the submit control while a request is in flight.
    pub fn begin_submit(&mut self) {
        self.submitting = true;
    }

    /// Re-enables the submit control.
    pub fn end_submit(&mut self) {
        self.submitting = false;
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn submit_enabled(&self) -> bool {
        !self.submitting
    }

    pub fn submit_label(&self) -> &'static str {
        if self.submitting {
            SUBMIT_LABEL_BUSY
        } else {
            SUBMIT_LABEL_IDLE
        }
    }

    fn reset(&mut self) {
        self.form = PersonaForm::default();
        self.was_validated = false;
        self.alert = None;
    }
}
