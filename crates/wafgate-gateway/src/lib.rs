//! wafgate gateway library entry.
//!
//! This crate wires config, token auth, the vendor client, and the group
//! dispatcher into the HTTP control API. It is intended to be consumed by
//! the binary (`main.rs`) and by integration tests.

pub mod api;
pub mod app_state;
pub mod auth;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod obs;
pub mod router;
pub mod vendor;
