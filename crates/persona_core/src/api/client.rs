//! Typed client for the persona collection endpoint.
//!
//! # Responsibility
//! - Build list/create/update requests and interpret their responses.
//! - Convert non-success statuses into `ApiError::Server` with the most
//!   informative reason available.
//!
//! # Invariants
//! - The base URL never ends with `/`.
//! - Update payloads always carry `id_persona`.

use super::body::{failure_reason, ResponseBody};
use super::transport::{ApiRequest, ApiResponse, Method, Transport, TransportError};
use crate::model::persona::{PersonaId, PersonaRecord};
use log::{error, info, warn};
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Key the backend expects for the record id in update/delete bodies.
pub const SERVER_ID_KEY: &str = "id_persona";

pub type ApiResult<T> = Result<T, ApiError>;

/// Failure of one API operation.
#[derive(Debug)]
pub enum ApiError {
    /// No response was obtained.
    Transport(TransportError),
    /// Non-success status; `reason` is ready to show to the user.
    Server { status: u16, reason: String },
    /// Success status with a body that cannot be interpreted.
    Decode(String),
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(err) => write!(f, "{err}"),
            Self::Server { reason, .. } => f.write_str(reason),
            Self::Decode(details) => write!(f, "respuesta inválida del servidor: {details}"),
        }
    }
}

impl Error for ApiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            Self::Server { .. } | Self::Decode(_) => None,
        }
    }
}

impl From<TransportError> for ApiError {
    fn from(value: TransportError) -> Self {
        Self::Transport(value)
    }
}

/// Client bound to one collection endpoint.
pub struct PersonaApi<T: Transport> {
    transport: T,
    base_url: String,
    reason_limit: usize,
}

impl<T: Transport> PersonaApi<T> {
    /// Creates a client; trailing slashes of `base_url` are dropped.
    pub fn new(transport: T, base_url: impl Into<String>, reason_limit: usize) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            transport,
            base_url,
            reason_limit,
        }
    }

    /// `BASE`, used for list, create, update and the body-based deletes.
    pub fn collection_url(&self) -> &str {
        &self.base_url
    }

    /// `BASE/<id>`.
    pub fn item_url(&self, id: PersonaId) -> String {
        format!("{}/{id}", self.base_url)
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Sends a prepared request without interpreting the status.
    pub fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        self.transport.send(request)
    }

    /// `GET BASE`.
    ///
    /// An empty body or a JSON value that is not an array yields an empty
    /// list; array items that do not decode are skipped.
    pub fn list(&self) -> ApiResult<Vec<PersonaRecord>> {
        let started_at = Instant::now();
        let request = ApiRequest::new(Method::Get, self.base_url.as_str());
        let response = self.checked_send("persona_list", &request)?;

        let records = match ResponseBody::parse(&response.body) {
            ResponseBody::Empty => Vec::new(),
            ResponseBody::Json(Value::Array(items)) => decode_records(items),
            ResponseBody::Json(other) => {
                warn!(
                    "event=persona_list module=api status=degraded reason=not_an_array kind={}",
                    json_kind(&other)
                );
                Vec::new()
            }
            ResponseBody::Text(_) => {
                error!("event=persona_list module=api status=error error_code=decode_failed");
                return Err(ApiError::Decode("se esperaba JSON".to_string()));
            }
        };

        info!(
            "event=persona_list module=api status=ok count={} duration_ms={}",
            records.len(),
            started_at.elapsed().as_millis()
        );
        Ok(records)
    }

    /// `POST BASE`; returns the identifier echoed by the server, if any.
    pub fn create(&self, fields: Map<String, Value>) -> ApiResult<Option<String>> {
        let request = ApiRequest::new(Method::Post, self.base_url.as_str())
            .with_json(Value::Object(fields));
        let response = self.checked_send("persona_create", &request)?;
        let echoed = echoed_id(&ResponseBody::parse(&response.body));
        info!(
            "event=persona_create module=api status=ok echoed_id={}",
            echoed.is_some()
        );
        Ok(echoed)
    }

    /// `PATCH BASE` with `id_persona` injected into `fields`.
    pub fn update(&self, id: PersonaId, mut fields: Map<String, Value>) -> ApiResult<()> {
        fields.insert(SERVER_ID_KEY.to_string(), Value::from(id));
        let request = ApiRequest::new(Method::Patch, self.base_url.as_str())
            .with_json(Value::Object(fields));
        self.checked_send("persona_update", &request)?;
        info!("event=persona_update module=api status=ok id={id}");
        Ok(())
    }

    /// Reason shown for a failed response.
    pub fn failure_reason(&self, response: &ApiResponse) -> String {
        failure_reason(response.status, &response.body, self.reason_limit)
    }

    fn checked_send(&self, event: &str, request: &ApiRequest) -> ApiResult<ApiResponse> {
        let response = match self.transport.send(request) {
            Ok(response) => response,
            Err(err) => {
                error!(
                    "event={event} module=api status=error error_code=transport_failed error={err}"
                );
                return Err(err.into());
            }
        };
        if !response.is_success() {
            let reason = self.failure_reason(&response);
            warn!(
                "event={event} module=api status=error error_code=http_status http_status={}",
                response.status
            );
            return Err(ApiError::Server {
                status: response.status,
                reason,
            });
        }
        Ok(response)
    }
}

fn decode_records(items: Vec<Value>) -> Vec<PersonaRecord> {
    let total = items.len();
    let records: Vec<PersonaRecord> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();
    if records.len() != total {
        warn!(
            "event=persona_list module=api status=degraded reason=skipped_items skipped={}",
            total - records.len()
        );
    }
    records
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Display form of the identifier echoed by a create response.
///
/// - Bare scalar: the scalar itself.
/// - Object: its `id_persona` or `id`, else the compact JSON.
/// - Empty body, `null`, `false`, `0`, `""` or `{}`: `None`.
pub fn echoed_id(body: &ResponseBody) -> Option<String> {
    match body {
        ResponseBody::Empty => None,
        ResponseBody::Text(text) => Some(text.trim().to_string()).filter(|t| !t.is_empty()),
        ResponseBody::Json(value) => match value {
            Value::Null | Value::Bool(false) => None,
            Value::Number(number) if number.as_f64() == Some(0.0) => None,
            Value::String(text) if text.is_empty() => None,
            Value::String(text) => Some(text.clone()),
            Value::Object(map) if map.is_empty() => None,
            Value::Object(map) => [SERVER_ID_KEY, "id"]
                .iter()
                .find_map(|key| map.get(*key).and_then(scalar_text))
                .or_else(|| Some(value.to_string())),
            other => Some(other.to_string()),
        },
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::echoed_id;
    use crate::api::body::ResponseBody;

    #[test]
    fn echoed_id_handles_scalar_and_object_shapes() {
        assert_eq!(
            echoed_id(&ResponseBody::parse("1324")).as_deref(),
            Some("1324")
        );
        assert_eq!(
            echoed_id(&ResponseBody::parse(r#"{"id_persona": 9}"#)).as_deref(),
            Some("9")
        );
        assert_eq!(
            echoed_id(&ResponseBody::parse(r#"{"ok": true}"#)).as_deref(),
            Some(r#"{"ok":true}"#)
        );
        assert_eq!(echoed_id(&ResponseBody::parse("")), None);
        assert_eq!(echoed_id(&ResponseBody::parse("{}")), None);
        assert_eq!(echoed_id(&ResponseBody::parse("null")), None);
    }

    #[test]
    fn echoed_zero_counts_as_missing() {
        assert_eq!(echoed_id(&ResponseBody::parse("0")), None);
        assert_eq!(echoed_id(&ResponseBody::parse("0.0")), None);
        assert_eq!(echoed_id(&ResponseBody::parse("10")).as_deref(), Some("10"));
    }
}
