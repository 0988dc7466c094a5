//! Top-level facade crate for wafgate.
//!
//! Re-exports core types and the gateway library so users can depend on a single crate.

pub mod core {
    pub use wafgate_core::*;
}

pub mod gateway {
    pub use wafgate_gateway::*;
}
