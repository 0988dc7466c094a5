//! Tracing subscriber bootstrap.
//!
//! `RUST_LOG` overrides the default `info` filter. With `server.log_file`
//! set, events go to that file (append, no ANSI) instead of stdout.

use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use wafgate_core::error::{Result, WafGateError};

pub fn init_logging(log_file: Option<&str>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = match log_file {
        Some(path) => {
            let file = open_log_file(path)?;
            Some(fmt::layer().with_ansi(false).with_writer(Arc::new(file)))
        }
        None => None,
    };
    let stdout_layer = file_layer.is_none().then(fmt::layer);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stdout_layer)
        .try_init()
        .map_err(|e| WafGateError::Internal(format!("logging init failed: {e}")))
}

fn open_log_file(path: &str) -> Result<File> {
    if let Some(dir) = Path::new(path).parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .map_err(|e| WafGateError::Config(format!("create log dir {} failed: {e}", dir.display())))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| WafGateError::Config(format!("open log file {path} failed: {e}")))
}
