//! Toolkit-independent view state.
//!
//! # Responsibility
//! - Model what a front-end shows (table, dialog, alerts, toasts, busy
//!   overlay) as plain data.
//! - Keep rendering and event wiring out of the core.

pub mod busy;
pub mod form;
pub mod notify;
pub mod table;
