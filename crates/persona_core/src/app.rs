//! Command handlers for the persona CRUD screen.
//!
//! # Responsibility
//! - Own all client state: record cache, table view, dialog, pending delete
//!   confirmation, toasts and busy overlay.
//! - Expose one handler per user action, each returning a typed outcome.
//!
//! # Invariants
//! - Every failure becomes a notification; no handler leaves the busy
//!   overlay visible or the submit control disabled on return.
//! - The cache changes only through a successful list load.
//! - Mutations are followed by a full reload, never by local patching.

use crate::api::client::{ApiError, ApiResult, PersonaApi};
use crate::api::transport::Transport;
use crate::config::ClientConfig;
use crate::model::persona::PersonaId;
use crate::service::delete_chain::{DeleteOutcome, DeleteStrategy};
use crate::service::persona_service::PersonaService;
use crate::service::store::PersonaStore;
use crate::ui::busy::BusyIndicator;
use crate::ui::form::FormDialog;
use crate::ui::notify::{AlertLevel, ToastStack};
use crate::ui::table::{self, ClickTarget, RowCommand, TableView};
use log::{info, warn};
use std::time::Instant;

/// Placeholder shown when a create response echoes no id.
pub const MISSING_ECHOED_ID: &str = "(sin id en respuesta)";

/// Pending delete awaiting user confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteConfirmation {
    pub id: PersonaId,
    pub display_name: String,
}

impl DeleteConfirmation {
    /// Question shown in the confirmation dialog.
    pub fn prompt(&self) -> String {
        format!(
            "¿Estás seguro de que deseas borrar a {} (ID: {})?",
            self.display_name, self.id
        )
    }
}

/// Result of the submit handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Dialog was not open; nothing happened.
    NotOpen,
    /// Validation failed; no request was sent.
    Invalid,
    /// Create succeeded; holds the displayed id.
    Created(String),
    Updated(PersonaId),
    /// Request failed; holds the reason shown inline.
    Failed(String),
}

/// Result of the delete confirmation handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteResult {
    /// No delete was pending.
    NothingPending,
    Deleted {
        id: PersonaId,
        strategy: DeleteStrategy,
        attempts: usize,
    },
    /// Holds the failure toast text.
    Failed(String),
}

/// Single-writer application state driven by command handlers.
pub struct PersonaApp<T: Transport> {
    service: PersonaService<T>,
    store: PersonaStore,
    table: TableView,
    dialog: FormDialog,
    pending_delete: Option<DeleteConfirmation>,
    toasts: ToastStack,
    busy: BusyIndicator,
}

impl<T: Transport> PersonaApp<T> {
    /// Builds the app over `transport` using `config`.
    pub fn new(transport: T, config: &ClientConfig) -> Self {
        let api = PersonaApi::new(
            transport,
            config.base_url.as_str(),
            config.raw_preview_limit,
        );
        let service =
            PersonaService::new(api, config.delete_chain.clone(), config.raw_preview_limit);
        Self {
            service,
            store: PersonaStore::new(),
            table: TableView::Pending,
            dialog: FormDialog::new(),
            pending_delete: None,
            toasts: ToastStack::new(config.toast_duration),
            busy: BusyIndicator::default(),
        }
    }

    /// Loads the list, re-renders the table and returns the record count.
    ///
    /// On failure the cache is kept and the table shows the inline error.
    pub fn load_table(&mut self) -> ApiResult<usize> {
        self.busy.show();
        let result = self.service.load_all(&mut self.store);
        match &result {
            Ok(_) => self.table = table::render(self.store.records()),
            Err(err) => {
                warn!(
                    "event=table_load module=app status=error error_code={}",
                    error_code(err)
                );
                self.table = table::load_error_view(&err.to_string());
            }
        }
        self.busy.hide();
        result
    }

    /// Opens the dialog for a new record.
    pub fn handle_create_new(&mut self) {
        self.dialog.open_create();
    }

    /// Opens the dialog for the cached record `id`.
    ///
    /// Returns `false` and leaves everything untouched when `id` is not
    /// cached.
    pub fn handle_edit(&mut self, id: PersonaId) -> bool {
        let Some(record) = self.store.find(id) else {
            warn!("event=edit_open module=app status=error error_code=not_in_cache id={id}");
            return false;
        };
        self.dialog.open_edit(record);
        true
    }

    /// Dispatches a click on row `row_index` of the current table.
    pub fn handle_row_click(
        &mut self,
        row_index: usize,
        target: ClickTarget,
    ) -> Option<RowCommand> {
        let command = self.table.rows().get(row_index)?.command_for(target);
        match &command {
            RowCommand::Edit(id) => {
                self.handle_edit(*id);
            }
            RowCommand::Delete { id, display_name } => {
                self.request_delete(*id, display_name.clone());
            }
        }
        Some(command)
    }

    /// Validates and sends the dialog's form as a create or update.
    pub fn handle_submit(&mut self) -> SubmitOutcome {
        if !self.dialog.is_open() {
            return SubmitOutcome::NotOpen;
        }
        if let Err(err) = self.dialog.validate() {
            info!(
                "event=persona_submit module=app status=invalid error_code={}",
                err.code()
            );
            self.dialog
                .show_alert(AlertLevel::Warning, err.user_message());
            return SubmitOutcome::Invalid;
        }

        self.dialog.begin_submit();
        let payload = self.dialog.form().to_payload();
        let target = self.dialog.hidden_id();
        let result = match target {
            Some(id) => self.service.update(id, payload).map(|()| {
                (
                    SubmitOutcome::Updated(id),
                    format!("Persona (ID: {id}) actualizada exitosamente."),
                )
            }),
            None => self.service.create(payload).map(|echoed| {
                let shown = echoed.unwrap_or_else(|| MISSING_ECHOED_ID.to_string());
                let message = format!("Persona (ID: {shown}) registrada exitosamente.");
                (SubmitOutcome::Created(shown), message)
            }),
        };
        self.dialog.end_submit();

        match result {
            Ok((outcome, message)) => {
                info!(
                    "event=persona_submit module=app status=ok mode={}",
                    target.map_or("create", |_| "update")
                );
                self.toasts
                    .push(AlertLevel::Success, message, Instant::now());
                self.dialog.close();
                let _ = self.load_table();
                outcome
            }
            Err(err) => {
                let reason = err.to_string();
                warn!(
                    "event=persona_submit module=app status=error error_code={}",
                    error_code(&err)
                );
                self.dialog
                    .show_alert(AlertLevel::Danger, format!("Falló el registro: {reason}"));
                SubmitOutcome::Failed(reason)
            }
        }
    }

    /// Records a pending delete and returns the confirmation to show.
    pub fn request_delete(
        &mut self,
        id: PersonaId,
        display_name: impl Into<String>,
    ) -> &DeleteConfirmation {
        self.pending_delete.insert(DeleteConfirmation {
            id,
            display_name: display_name.into(),
        })
    }

    /// Discards the pending delete.
    pub fn cancel_delete(&mut self) -> Option<DeleteConfirmation> {
        self.pending_delete.take()
    }

    /// Runs the delete chain for the pending confirmation.
    pub fn confirm_delete(&mut self) -> DeleteResult {
        let Some(pending) = self.pending_delete.take() else {
            return DeleteResult::NothingPending;
        };

        self.busy.show();
        match self.service.delete(pending.id) {
            DeleteOutcome::Deleted { strategy, attempts } => {
                self.toasts.push(
                    AlertLevel::Success,
                    format!("Persona (ID: {}) borrada exitosamente.", pending.id),
                    Instant::now(),
                );
                let _ = self.load_table();
                DeleteResult::Deleted {
                    id: pending.id,
                    strategy,
                    attempts,
                }
            }
            DeleteOutcome::Failed(failure) => {
                self.busy.hide();
                let message = failure.user_message();
                self.toasts
                    .push(AlertLevel::Danger, message.clone(), Instant::now());
                DeleteResult::Failed(message)
            }
        }
    }

    /// Drops toasts whose display time has elapsed.
    pub fn prune_toasts(&mut self, now: Instant) -> usize {
        self.toasts.prune(now)
    }

    pub fn store(&self) -> &PersonaStore {
        &self.store
    }

    pub fn table(&self) -> &TableView {
        &self.table
    }

    pub fn dialog(&self) -> &FormDialog {
        &self.dialog
    }

    /// Mutable access for entering field values.
    pub fn dialog_mut(&mut self) -> &mut FormDialog {
        &mut self.dialog
    }

    pub fn pending_delete(&self) -> Option<&DeleteConfirmation> {
        self.pending_delete.as_ref()
    }

    pub fn toasts(&self) -> &ToastStack {
        &self.toasts
    }

    pub fn toasts_mut(&mut self) -> &mut ToastStack {
        &mut self.toasts
    }

    pub fn busy(&self) -> &BusyIndicator {
        &self.busy
    }

    /// Underlying service, for callers that need the raw API.
    pub fn service(&self) -> &PersonaService<T> {
        &self.service
    }
}

fn error_code(err: &ApiError) -> &'static str {
    match err {
        ApiError::Transport(_) => "transport_failed",
        ApiError::Server { .. } => "http_status",
        ApiError::Decode(_) => "decode_failed",
    }
}
