//! Shared application state for the wafgate gateway.
//!
//! Built once at startup from the loaded config; read-only afterwards.

use std::sync::Arc;

use wafgate_core::error::Result;

use crate::auth::TokenAllowlist;
use crate::config::GatewayConfig;
use crate::dispatch::GroupDispatcher;
use crate::vendor::{Connector, HttpConnector};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    dispatcher: Arc<GroupDispatcher>,
}

struct AppStateInner {
    tokens: TokenAllowlist,
}

impl AppState {
    /// Build application state with the reqwest-backed vendor connector.
    pub fn new(cfg: GatewayConfig) -> Result<Self> {
        let connector = HttpConnector::new(&cfg.vendor)?;
        Self::with_connector(cfg, Arc::new(connector))
    }

    /// Build application state over any vendor connector.
    pub fn with_connector(cfg: GatewayConfig, connector: Arc<dyn Connector>) -> Result<Self> {
        let tokens = TokenAllowlist::from_config(&cfg.auth)?;

        // incomplete entries stay in place and are reported per dispatch
        for (group, waf, e) in cfg.incomplete_instances() {
            tracing::warn!(group = %group, waf = %waf, error = %e, "WAF instance is incomplete and will be reported as failed");
        }

        let dispatcher = GroupDispatcher::new(&cfg, connector);
        tracing::info!(groups = ?dispatcher.group_names(), tokens = tokens.len(), "gateway state ready");

        Ok(Self {
            inner: Arc::new(AppStateInner { tokens }),
            dispatcher: Arc::new(dispatcher),
        })
    }

    pub fn tokens(&self) -> &TokenAllowlist {
        &self.inner.tokens
    }

    pub fn dispatcher(&self) -> Arc<GroupDispatcher> {
        Arc::clone(&self.dispatcher)
    }
}
