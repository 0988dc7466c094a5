//! Observability bootstrap (structured logging).

pub mod logging;

pub use logging::init_logging;
