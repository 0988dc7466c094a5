//! Dispatcher module exports.
//!
//! Re-exports the group dispatcher so handlers and tests can depend on this
//! module directly.

pub mod dispatcher;
pub mod fanout;

pub use dispatcher::{GroupDispatcher, SwitchKind};
