//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate API calls into load/create/update/delete use cases.
//! - Own the record cache type and the delete fallback chain.

pub mod delete_chain;
pub mod persona_service;
pub mod store;
