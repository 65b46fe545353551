#![allow(dead_code)]

use persona_core::{
    ApiRequest, ApiResponse, ClientConfig, DeleteStrategy, Method, PersonaApp, Transport,
    TransportError,
};
use serde_json::{json, Map, Value};
use std::cell::RefCell;
use std::collections::VecDeque;

pub const BASE: &str = "http://backend.test/v1/escuela/persona";

pub fn test_config() -> ClientConfig {
    ClientConfig::default().with_base_url(BASE)
}

/// Returns queued responses in order and records every request.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: RefCell<VecDeque<Result<ApiResponse, String>>>,
    sent: RefCell<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, status: u16, body: &str) -> Self {
        self.replies
            .borrow_mut()
            .push_back(Ok(ApiResponse::new(status, body)));
        self
    }

    pub fn fail(self, message: &str) -> Self {
        self.replies
            .borrow_mut()
            .push_back(Err(message.to_string()));
        self
    }

    pub fn sent(&self) -> Vec<ApiRequest> {
        self.sent.borrow().clone()
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        self.sent.borrow_mut().push(request.clone());
        match self.replies.borrow_mut().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(TransportError::Other(message)),
            None => Err(TransportError::Other("no scripted reply".to_string())),
        }
    }
}

/// In-memory stand-in for the persona endpoint.
///
/// Only the delete forms listed in `accepted_deletes` succeed; the others
/// answer 405 with a structured message.
pub struct FakeBackend {
    rows: RefCell<Vec<Value>>,
    next_id: RefCell<i64>,
    accepted_deletes: Vec<DeleteStrategy>,
    sent: RefCell<Vec<ApiRequest>>,
}

impl FakeBackend {
    pub fn new(accepted_deletes: &[DeleteStrategy]) -> Self {
        Self {
            rows: RefCell::new(Vec::new()),
            next_id: RefCell::new(1),
            accepted_deletes: accepted_deletes.to_vec(),
            sent: RefCell::new(Vec::new()),
        }
    }

    pub fn with_row(self, row: Value) -> Self {
        if let Some(id) = row["id"].as_i64() {
            let mut next = self.next_id.borrow_mut();
            *next = (*next).max(id + 1);
        }
        self.rows.borrow_mut().push(row);
        self
    }

    pub fn rows(&self) -> Vec<Value> {
        self.rows.borrow().clone()
    }

    pub fn sent(&self) -> Vec<ApiRequest> {
        self.sent.borrow().clone()
    }

    fn body_id(request: &ApiRequest) -> Option<i64> {
        let body = request.body.as_ref()?;
        body["id_persona"].as_i64().or_else(|| body["id"].as_i64())
    }

    fn remove(&self, strategy: DeleteStrategy, id: Option<i64>) -> ApiResponse {
        if !self.accepted_deletes.contains(&strategy) {
            return ApiResponse::new(405, r#"{"message":"Método no permitido"}"#);
        }
        let Some(id) = id else {
            return ApiResponse::new(400, r#"{"message":"id requerido"}"#);
        };
        let mut rows = self.rows.borrow_mut();
        let before = rows.len();
        rows.retain(|row| row["id"].as_i64() != Some(id));
        if rows.len() == before {
            return ApiResponse::new(404, r#"{"message":"persona no encontrada"}"#);
        }
        ApiResponse::new(200, r#"{"message":"ok"}"#)
    }

    fn insert(&self, fields: &Map<String, Value>) -> ApiResponse {
        let id = {
            let mut next = self.next_id.borrow_mut();
            let id = *next;
            *next += 1;
            id
        };
        let mut row = fields.clone();
        row.insert("id".to_string(), Value::from(id));
        if let Some(label) = role_label(fields.get("id_rol")) {
            row.insert("rol".to_string(), Value::from(label));
        }
        self.rows.borrow_mut().push(Value::Object(row));
        ApiResponse::new(201, json!({ "id_persona": id }).to_string())
    }

    fn patch(&self, fields: &Map<String, Value>) -> ApiResponse {
        let Some(id) = fields.get("id_persona").and_then(Value::as_i64) else {
            return ApiResponse::new(400, r#"{"message":"id_persona requerido"}"#);
        };
        let mut rows = self.rows.borrow_mut();
        let Some(row) = rows.iter_mut().find(|row| row["id"].as_i64() == Some(id)) else {
            return ApiResponse::new(404, r#"{"message":"persona no encontrada"}"#);
        };
        if let Value::Object(target) = row {
            for (key, value) in fields {
                if key != "id_persona" {
                    target.insert(key.clone(), value.clone());
                }
            }
            if let Some(label) = role_label(fields.get("id_rol")) {
                target.insert("rol".to_string(), Value::from(label));
            }
        }
        ApiResponse::new(200, "")
    }
}

fn role_label(code: Option<&Value>) -> Option<&'static str> {
    match code.and_then(Value::as_i64) {
        Some(1) => Some("Estudiante"),
        Some(2) => Some("Profesor"),
        _ => None,
    }
}

impl Transport for FakeBackend {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        self.sent.borrow_mut().push(request.clone());
        let item_prefix = format!("{BASE}/");
        let response = match (request.method, request.url.as_str()) {
            (Method::Get, BASE) => ApiResponse::new(200, Value::Array(self.rows()).to_string()),
            (Method::Post, BASE) if request.header("x-http-method-override") == Some("DELETE") => {
                self.remove(DeleteStrategy::MethodOverride, Self::body_id(request))
            }
            (Method::Post, BASE) => match &request.body {
                Some(Value::Object(fields)) => self.insert(fields),
                _ => ApiResponse::new(400, r#"{"message":"cuerpo inválido"}"#),
            },
            (Method::Patch, BASE) => match &request.body {
                Some(Value::Object(fields)) => self.patch(fields),
                _ => ApiResponse::new(400, r#"{"message":"cuerpo inválido"}"#),
            },
            (Method::Delete, BASE) => {
                self.remove(DeleteStrategy::CollectionBody, Self::body_id(request))
            }
            (Method::Delete, url) if url.starts_with(&item_prefix) => {
                let id = url[item_prefix.len()..].parse::<i64>().ok();
                self.remove(DeleteStrategy::ByPath, id)
            }
            _ => ApiResponse::new(404, "Not Found"),
        };
        Ok(response)
    }
}

pub fn app_over<T: Transport>(transport: T) -> PersonaApp<T> {
    PersonaApp::new(transport, &test_config())
}

pub fn row(id: i64, nombre: &str, apellido: &str) -> Value {
    json!({
        "id": id,
        "nombre": nombre,
        "apellido": apellido,
        "sexo": "M",
        "fh_nac": "2000-01-15",
        "rol": "Estudiante",
        "id_rol": 1
    })
}
