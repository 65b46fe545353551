//! Ordered delete fallback chain.
//!
//! The backend's delete contract is inconsistent, so deletion tries several
//! request shapes in a fixed order and stops at the first 2xx:
//!
//! 1. `DELETE BASE/<id>` without body.
//! 2. `DELETE BASE` with `{"id_persona": id, "id": id}`.
//! 3. `POST BASE` with the same body and `X-HTTP-Method-Override: DELETE`.
//!
//! # Invariants
//! - Each configured strategy is attempted at most once, in order.
//! - A transport failure aborts the chain; later strategies are not tried.
//! - The failure reason comes from the last response received.

use crate::api::body::{http_status_reason, truncate_chars, ResponseBody};
use crate::api::client::{PersonaApi, SERVER_ID_KEY};
use crate::api::transport::{ApiRequest, Method, Transport, METHOD_OVERRIDE_HEADER};
use crate::model::persona::PersonaId;
use log::{info, warn};
use serde_json::{json, Value};

/// One request shape of the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeleteStrategy {
    /// `DELETE BASE/<id>`.
    ByPath,
    /// `DELETE BASE` with a JSON body.
    CollectionBody,
    /// `POST BASE` with a JSON body and a method-override header.
    MethodOverride,
}

impl DeleteStrategy {
    /// Stable name used in log events.
    pub fn name(self) -> &'static str {
        match self {
            Self::ByPath => "by_path",
            Self::CollectionBody => "collection_body",
            Self::MethodOverride => "method_override",
        }
    }

    /// Builds the request for `id` against `collection_url`.
    pub fn build_request(self, collection_url: &str, id: PersonaId) -> ApiRequest {
        match self {
            Self::ByPath => ApiRequest::new(Method::Delete, format!("{collection_url}/{id}")),
            Self::CollectionBody => {
                ApiRequest::new(Method::Delete, collection_url).with_json(delete_body(id))
            }
            Self::MethodOverride => ApiRequest::new(Method::Post, collection_url)
                .with_json(delete_body(id))
                .with_header(METHOD_OVERRIDE_HEADER, Method::Delete.as_str()),
        }
    }
}

/// Body carrying the id under both keys the backend has been seen to use.
pub fn delete_body(id: PersonaId) -> Value {
    json!({ SERVER_ID_KEY: id, "id": id })
}

/// Non-empty, duplicate-free sequence of strategies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteChain {
    strategies: Vec<DeleteStrategy>,
}

impl DeleteChain {
    /// All three strategies in canonical order.
    pub fn full() -> Self {
        Self {
            strategies: vec![
                DeleteStrategy::ByPath,
                DeleteStrategy::CollectionBody,
                DeleteStrategy::MethodOverride,
            ],
        }
    }

    /// Only `DELETE BASE/<id>`, for a conforming backend.
    pub fn path_only() -> Self {
        Self {
            strategies: vec![DeleteStrategy::ByPath],
        }
    }

    /// Custom chain; duplicates are dropped, `None` when nothing remains.
    pub fn new(strategies: impl IntoIterator<Item = DeleteStrategy>) -> Option<Self> {
        let mut unique = Vec::new();
        for strategy in strategies {
            if !unique.contains(&strategy) {
                unique.push(strategy);
            }
        }
        if unique.is_empty() {
            None
        } else {
            Some(Self { strategies: unique })
        }
    }

    /// Parses `full` or `path` (case-insensitive).
    pub fn from_mode(mode: &str) -> Option<Self> {
        match mode.trim().to_ascii_lowercase().as_str() {
            "full" => Some(Self::full()),
            "path" => Some(Self::path_only()),
            _ => None,
        }
    }

    /// Strategies in the order they are attempted.
    pub fn strategies(&self) -> &[DeleteStrategy] {
        &self.strategies
    }
}

impl Default for DeleteChain {
    fn default() -> Self {
        Self::full()
    }
}

/// Why the whole chain failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteFailure {
    /// Reason shown to the user.
    pub reason: String,
    /// Last raw body received, already bounded.
    pub last_raw: Option<String>,
    /// Status of the last response, if any arrived.
    pub last_status: Option<u16>,
    /// Requests actually sent.
    pub attempts: usize,
}

impl DeleteFailure {
    /// `Error al borrar: <reason>` plus a server response preview.
    pub fn user_message(&self) -> String {
        match &self.last_raw {
            Some(raw) => format!(
                "Error al borrar: {}\n\nRespuesta del servidor:\n{raw}",
                self.reason
            ),
            None => format!("Error al borrar: {}", self.reason),
        }
    }
}

/// Result of running the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted {
        strategy: DeleteStrategy,
        attempts: usize,
    },
    Failed(DeleteFailure),
}

/// Reason from the last failed response: `message`, else raw body, else
/// `Error HTTP: <status>`.
pub fn delete_failure_reason(status: u16, raw: &str, limit: usize) -> String {
    if let Some(message) = ResponseBody::parse(raw).message() {
        return truncate_chars(&message, limit);
    }
    if !raw.trim().is_empty() {
        return truncate_chars(raw, limit);
    }
    http_status_reason(status)
}

/// Runs `chain` for `id`, stopping at the first success.
pub fn run_delete_chain<T: Transport>(
    api: &PersonaApi<T>,
    chain: &DeleteChain,
    id: PersonaId,
    limit: usize,
) -> DeleteOutcome {
    let mut last_raw: Option<String> = None;
    let mut last_status: Option<u16> = None;
    let mut attempts = 0;

    for strategy in chain.strategies() {
        let request = strategy.build_request(api.collection_url(), id);
        attempts += 1;
        let response = match api.send(&request) {
            Ok(response) => response,
            Err(err) => {
                warn!(
                    "event=persona_delete module=service status=error id={id} strategy={} error_code=transport_failed",
                    strategy.name()
                );
                return DeleteOutcome::Failed(DeleteFailure {
                    reason: err.to_string(),
                    last_raw: last_raw
                        .map(|raw| truncate_chars(&raw, limit))
                        .filter(|raw| !raw.is_empty()),
                    last_status,
                    attempts,
                });
            }
        };

        if response.is_success() {
            info!(
                "event=persona_delete module=service status=ok id={id} strategy={} attempts={attempts}",
                strategy.name()
            );
            return DeleteOutcome::Deleted {
                strategy: *strategy,
                attempts,
            };
        }

        info!(
            "event=persona_delete module=service status=fallback id={id} strategy={} http_status={}",
            strategy.name(),
            response.status
        );
        last_status = Some(response.status);
        last_raw = Some(response.body);
    }

    let status = last_status.unwrap_or_default();
    let raw = last_raw.unwrap_or_default();
    warn!(
        "event=persona_delete module=service status=error id={id} error_code=all_strategies_failed attempts={attempts}"
    );
    DeleteOutcome::Failed(DeleteFailure {
        reason: delete_failure_reason(status, &raw, limit),
        last_raw: Some(truncate_chars(&raw, limit)).filter(|raw| !raw.is_empty()),
        last_status,
        attempts,
    })
}
