//! Gateway config loader (strict parsing).

pub mod schema;

use std::fs;

use wafgate_core::error::{Result, WafGateError};

pub use schema::{
    AuthSection, DispatchSection, GatewayConfig, InstanceConfig, InstanceDescriptor,
    ServerSection, VendorSection,
};

/// Env var naming the config file.
pub const CONFIG_ENV: &str = "WAFGATE_CONFIG";

/// Used when `WAFGATE_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "wafgate.yaml";

pub fn config_path() -> String {
    std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}

pub fn load_from_file(path: &str) -> Result<GatewayConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| WafGateError::Config(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<GatewayConfig> {
    let cfg: GatewayConfig = serde_yaml::from_str(s)
        .map_err(|e| WafGateError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
