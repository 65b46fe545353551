//! Core client logic for the school "Persona" records screen.
//! This crate owns every behavior; front-ends only render its state and
//! forward user actions to `PersonaApp`.

pub mod api;
pub mod app;
pub mod config;
pub mod logging;
pub mod model;
pub mod service;
pub mod ui;

pub use api::{
    ApiError, ApiRequest, ApiResponse, ApiResult, Method, PersonaApi, ReqwestTransport,
    ResponseBody, Transport, TransportError,
};
pub use app::{DeleteConfirmation, DeleteResult, PersonaApp, SubmitOutcome, MISSING_ECHOED_ID};
pub use config::{ClientConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::persona::{PersonaId, PersonaRecord, Role, Sex};
pub use service::delete_chain::{DeleteChain, DeleteFailure, DeleteOutcome, DeleteStrategy};
pub use service::persona_service::PersonaService;
pub use service::store::PersonaStore;
pub use ui::form::{FormDialog, FormValidationError, PersonaForm};
pub use ui::notify::{AlertLevel, InlineAlert, Toast, ToastStack};
pub use ui::table::{ClickTarget, RowCommand, TableRow, TableView};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
