//! wafgate core: transport-agnostic contracts shared by the gateway and tools.
//!
//! This crate defines the error surface, the URL rule / vendor pattern
//! grammar, and the per-unit result records returned by the dispatcher. It
//! carries no transport or runtime dependencies so it can be reused by the
//! gateway and by any operator tooling.
//!
//! # Panics
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `WafGateError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod pattern;
pub mod report;

/// Shared result type.
pub use error::{Result, WafGateError};
