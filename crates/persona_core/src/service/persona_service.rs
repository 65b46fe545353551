//! Persona use-case service.
//!
//! # Responsibility
//! - Provide load/create/update/delete entry points over `PersonaApi`.
//! - Own the delete fallback configuration.
//!
//! # Invariants
//! - `load_all` touches the store only on success.
//! - Mutations never patch the store; callers reload instead.

use crate::api::client::{ApiResult, PersonaApi};
use crate::api::transport::Transport;
use crate::model::persona::PersonaId;
use crate::service::delete_chain::{run_delete_chain, DeleteChain, DeleteOutcome};
use crate::service::store::PersonaStore;
use serde_json::{Map, Value};

/// Service facade over one API client.
pub struct PersonaService<T: Transport> {
    api: PersonaApi<T>,
    delete_chain: DeleteChain,
    reason_limit: usize,
}

impl<T: Transport> PersonaService<T> {
    /// `reason_limit` bounds, in chars, the server text quoted in failure messages.
    pub fn new(api: PersonaApi<T>, delete_chain: DeleteChain, reason_limit: usize) -> Self {
        Self {
            api,
            delete_chain,
            reason_limit,
        }
    }

    pub fn api(&self) -> &PersonaApi<T> {
        &self.api
    }

    pub fn delete_chain(&self) -> &DeleteChain {
        &self.delete_chain
    }

    /// Fetches all records and replaces `store` with them.
    ///
    /// Returns the number of records loaded.
    pub fn load_all(&self, store: &mut PersonaStore) -> ApiResult<usize> {
        let records = self.api.list()?;
        let count = records.len();
        store.replace(records);
        Ok(count)
    }

    /// Creates one record; returns the identifier echoed by the server.
    pub fn create(&self, fields: Map<String, Value>) -> ApiResult<Option<String>> {
        self.api.create(fields)
    }

    /// Partially updates the record `id`.
    pub fn update(&self, id: PersonaId, fields: Map<String, Value>) -> ApiResult<()> {
        self.api.update(id, fields)
    }

    /// Deletes `id` through the configured fallback chain.
    pub fn delete(&self, id: PersonaId) -> DeleteOutcome {
        run_delete_chain(&self.api, &self.delete_chain, id, self.reason_limit)
    }
}
