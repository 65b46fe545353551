//! Domain model for person records served by the school API.
//!
//! # Responsibility
//! - Define the canonical record shape shared by loader, table and form.
//! - Absorb backend typing inconsistencies at the decode boundary.
//!
//! # Invariants
//! - Every record is identified by a server-assigned `PersonaId`.
//! - Role code is derivable from the role label when the code is absent.

pub mod persona;
