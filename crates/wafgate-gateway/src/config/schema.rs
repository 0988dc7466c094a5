use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;
use wafgate_core::error::{Result, WafGateError};
use wafgate_core::pattern::UrlRule;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    pub auth: AuthSection,

    #[serde(default)]
    pub vendor: VendorSection,

    #[serde(default)]
    pub dispatch: DispatchSection,

    #[serde(default)]
    pub groups: BTreeMap<String, Vec<InstanceConfig>>,
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(WafGateError::Config(format!(
                "unsupported config version: {}",
                self.version
            )));
        }
        if self.groups.is_empty() {
            return Err(WafGateError::Config("groups must not be empty".into()));
        }

        self.server.validate()?;
        self.auth.validate()?;
        self.vendor.validate()?;
        self.dispatch.validate()?;

        if self.dispatch.strict_instances {
            if let Some((group, name, e)) = self.incomplete_instances().into_iter().next() {
                return Err(WafGateError::Config(format!("group {group}, instance {name}: {e}")));
            }
        }

        Ok(())
    }

    /// `(group, display name, error)` for every entry that cannot run switches.
    pub fn incomplete_instances(&self) -> Vec<(String, String, WafGateError)> {
        let mut out = Vec::new();
        for (group, instances) in &self.groups {
            for (idx, inst) in instances.iter().enumerate() {
                if let Err(e) = inst.descriptor() {
                    out.push((group.clone(), inst.display_name(group, idx), e));
                }
            }
        }
        out
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Log destination. stdout when absent.
    #[serde(default)]
    pub log_file: Option<String>,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self { listen: default_listen(), log_file: None }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|_| {
            WafGateError::Config(format!("server.listen must be a valid SocketAddr: {}", self.listen))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:8000".into()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthSection {
    /// Header carrying the shared secret. `Authorization: Bearer` is accepted too.
    #[serde(default = "default_token_header")]
    pub header: String,

    pub tokens: Vec<String>,
}

impl AuthSection {
    pub fn validate(&self) -> Result<()> {
        if self.tokens.iter().all(|t| t.trim().is_empty()) {
            return Err(WafGateError::Config("auth.tokens must not be empty".into()));
        }
        let header = axum::http::HeaderName::from_bytes(self.header.as_bytes()).map_err(|_| {
            WafGateError::Config(format!("auth.header is not a valid header name: {}", self.header))
        })?;
        if header == axum::http::header::AUTHORIZATION {
            return Err(WafGateError::Config(
                "auth.header must not be authorization; Bearer tokens are always accepted".into(),
            ));
        }
        Ok(())
    }
}

fn default_token_header() -> String {
    "token".into()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VendorSection {
    /// Per-attempt request timeout.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Total attempts, first one included.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Exponential backoff base between attempts.
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,

    #[serde(default = "default_retry_statuses")]
    pub retry_statuses: Vec<u16>,

    /// Vendor instances sit on an internal network with self-signed certs.
    #[serde(default = "default_accept_invalid_certs")]
    pub accept_invalid_certs: bool,
}

impl Default for VendorSection {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            max_attempts: default_max_attempts(),
            backoff_ms: default_backoff_ms(),
            retry_statuses: default_retry_statuses(),
            accept_invalid_certs: default_accept_invalid_certs(),
        }
    }
}

impl VendorSection {
    pub fn validate(&self) -> Result<()> {
        if self.timeout_ms == 0 {
            return Err(WafGateError::Config("vendor.timeout_ms must be greater than 0".into()));
        }
        if !(1..=10).contains(&self.max_attempts) {
            return Err(WafGateError::Config(
                "vendor.max_attempts must be between 1 and 10".into(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn default_timeout_ms() -> u64 {
    30_000
}
fn default_max_attempts() -> u32 {
    3
}
fn default_backoff_ms() -> u64 {
    1_000
}
fn default_retry_statuses() -> Vec<u16> {
    vec![429, 500, 502, 503, 504]
}
fn default_accept_invalid_certs() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DispatchSection {
    /// Concurrent units per fan-out level. Levels nest: instances are bounded
    /// by this, and so are the sites of each instance, so one request can have
    /// up to `max_in_flight^2` vendor calls open (256 with the default).
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,

    /// Upper bound for one site/policy unit, retries included.
    #[serde(default = "default_unit_deadline_ms")]
    pub unit_deadline_ms: u64,

    /// Fail startup on incomplete instances instead of isolating them.
    #[serde(default)]
    pub strict_instances: bool,
}

impl Default for DispatchSection {
    fn default() -> Self {
        Self {
            max_in_flight: default_max_in_flight(),
            unit_deadline_ms: default_unit_deadline_ms(),
            strict_instances: false,
        }
    }
}

impl DispatchSection {
    pub fn validate(&self) -> Result<()> {
        if self.max_in_flight == 0 {
            return Err(WafGateError::Config("dispatch.max_in_flight must be at least 1".into()));
        }
        if self.unit_deadline_ms == 0 {
            return Err(WafGateError::Config(
                "dispatch.unit_deadline_ms must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    pub fn unit_deadline(&self) -> Duration {
        Duration::from_millis(self.unit_deadline_ms)
    }
}

fn default_max_in_flight() -> usize {
    16
}
fn default_unit_deadline_ms() -> u64 {
    120_000
}

/// Raw instance entry. Required fields stay optional here so one incomplete
/// entry can be reported per instance instead of rejecting the whole group.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct InstanceConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default, alias = "id")]
    pub site_ids: Option<Vec<u64>>,
    #[serde(default)]
    pub policy_ids: Vec<u64>,
    #[serde(default, alias = "URL")]
    pub url_rules: Vec<UrlRule>,
}

impl InstanceConfig {
    pub fn display_name(&self, group: &str, idx: usize) -> String {
        match &self.name {
            Some(n) if !n.is_empty() => n.clone(),
            _ => format!("{group}#{idx}"),
        }
    }

    /// Checked view for site switches, or `Config` naming the first missing field.
    pub fn descriptor(&self) -> Result<InstanceDescriptor> {
        self.checked(true)
    }

    /// Checked view for status reads. Site ids are not needed there and
    /// default to empty.
    pub fn status_descriptor(&self) -> Result<InstanceDescriptor> {
        self.checked(false)
    }

    fn checked(&self, require_sites: bool) -> Result<InstanceDescriptor> {
        let name = non_empty(self.name.as_deref(), "name")?;
        let base_url = non_empty(self.base_url.as_deref(), "base_url")?;
        let api_token = non_empty(self.api_token.as_deref(), "api_token")?;
        let site_ids = match (&self.site_ids, require_sites) {
            (Some(ids), _) => ids.clone(),
            (None, false) => Vec::new(),
            (None, true) => return Err(missing("site_ids")),
        };

        Ok(InstanceDescriptor {
            name: name.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token: api_token.to_string(),
            site_ids,
            policy_ids: self.policy_ids.clone(),
            url_rules: self.url_rules.clone(),
        })
    }
}

fn non_empty<'a>(v: Option<&'a str>, field: &str) -> Result<&'a str> {
    match v {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => Err(missing(field)),
    }
}

fn missing(field: &str) -> WafGateError {
    WafGateError::Config(format!("missing required field: {field}"))
}

/// Validated, immutable description of one WAF instance.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceDescriptor {
    pub name: String,
    pub base_url: String,
    pub api_token: String,
    pub site_ids: Vec<u64>,
    pub policy_ids: Vec<u64>,
    pub url_rules: Vec<UrlRule>,
}
