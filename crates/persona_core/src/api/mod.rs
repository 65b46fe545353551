//! REST access to the persona collection endpoint.
//!
//! # Responsibility
//! - Keep HTTP details (verbs, headers, body parsing) out of the
//!   command handlers.
//! - Expose one transport seam so the backend can be faked in tests.
//!
//! # Invariants
//! - Every response body is interpreted through `ResponseBody`.
//! - Transport failures and server-reported failures stay distinct.

pub mod body;
pub mod client;
pub mod http;
pub mod transport;

pub use body::{failure_reason, http_status_reason, truncate_chars, ResponseBody};
pub use client::{echoed_id, ApiError, ApiResult, PersonaApi, SERVER_ID_KEY};
pub use http::ReqwestTransport;
pub use transport::{
    ApiRequest, ApiResponse, Method, Transport, TransportError, METHOD_OVERRIDE_HEADER,
};
