//! Per-unit result records returned by a group dispatch.
//!
//! Errors are data here: every site, policy, and instance that was asked for
//! gets exactly one record, with failures carried as structured fields.

use serde::Serialize;
use serde_json::{json, Value};

use crate::error::WafGateError;

/// Placeholder used when a failure carried no upstream body.
pub const NO_DETAILS: &str = "No additional details";

/// Outcome of a single unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitStatus {
    Success,
    Error,
}

/// Result of one switch call against one site.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteResult {
    pub site_id: u64,
    pub status: UnitStatus,
    /// Vendor response body on success, `{error, details}` on failure.
    pub result: Value,
}

impl SiteResult {
    pub fn success(site_id: u64, body: Value) -> Self {
        Self { site_id, status: UnitStatus::Success, result: body }
    }

    pub fn failure(site_id: u64, err: &WafGateError) -> Self {
        Self { site_id, status: UnitStatus::Error, result: error_body(err) }
    }

    pub fn is_success(&self) -> bool {
        self.status == UnitStatus::Success
    }
}

/// Build the `{error, details}` record for a failed unit.
///
/// Vendor bodies that are JSON are embedded as JSON, anything else as text.
pub fn error_body(err: &WafGateError) -> Value {
    let details = match err.details() {
        Some(body) => serde_json::from_str::<Value>(body).unwrap_or_else(|_| Value::from(body)),
        None => Value::from(NO_DETAILS),
    };
    json!({ "error": err.to_string(), "details": details })
}

/// Enablement of a policy as last read from the vendor.
///
/// `Unknown` covers both a failed read and a response without `is_enabled`;
/// it is never folded into `Disabled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyState {
    Enabled,
    Disabled,
    Unknown,
}

impl PolicyState {
    pub fn as_bool(self) -> Option<bool> {
        match self {
            PolicyState::Enabled => Some(true),
            PolicyState::Disabled => Some(false),
            PolicyState::Unknown => None,
        }
    }

    /// Read `data.is_enabled` from a policy detail response.
    pub fn from_detail(detail: &Value) -> Self {
        match detail.pointer("/data/is_enabled").and_then(Value::as_bool) {
            Some(true) => PolicyState::Enabled,
            Some(false) => PolicyState::Disabled,
            None => PolicyState::Unknown,
        }
    }
}

/// Result of one status read against one policy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicyStatus {
    pub policy_id: u64,
    pub status: UnitStatus,
    pub is_enabled: Option<bool>,
    pub state: PolicyState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PolicyStatus {
    pub fn read(policy_id: u64, detail: &Value) -> Self {
        let state = PolicyState::from_detail(detail);
        Self {
            policy_id,
            status: UnitStatus::Success,
            is_enabled: state.as_bool(),
            state,
            error: None,
        }
    }

    pub fn failure(policy_id: u64, err: &WafGateError) -> Self {
        Self {
            policy_id,
            status: UnitStatus::Error,
            is_enabled: None,
            state: PolicyState::Unknown,
            error: Some(err.to_string()),
        }
    }
}

/// What happened on one WAF instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum InstanceOutcome {
    Sites { results: Vec<SiteResult> },
    Policies { policies: Vec<PolicyStatus> },
    /// The instance failed before any site/policy call was attempted.
    Failed { status: UnitStatus, error: String },
}

/// Per-instance aggregate keyed by the instance display name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstanceReport {
    pub waf_name: String,
    #[serde(flatten)]
    pub outcome: InstanceOutcome,
}

impl InstanceReport {
    pub fn sites(waf_name: impl Into<String>, results: Vec<SiteResult>) -> Self {
        Self { waf_name: waf_name.into(), outcome: InstanceOutcome::Sites { results } }
    }

    pub fn policies(waf_name: impl Into<String>, policies: Vec<PolicyStatus>) -> Self {
        Self { waf_name: waf_name.into(), outcome: InstanceOutcome::Policies { policies } }
    }

    pub fn failed(waf_name: impl Into<String>, err: &WafGateError) -> Self {
        Self {
            waf_name: waf_name.into(),
            outcome: InstanceOutcome::Failed { status: UnitStatus::Error, error: err.to_string() },
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, InstanceOutcome::Failed { .. })
    }

    pub fn site_results(&self) -> &[SiteResult] {
        match &self.outcome {
            InstanceOutcome::Sites { results } => results,
            _ => &[],
        }
    }

    pub fn policy_statuses(&self) -> &[PolicyStatus] {
        match &self.outcome {
            InstanceOutcome::Policies { policies } => policies,
            _ => &[],
        }
    }
}

/// Top-level response body: `{"results": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchReport {
    pub results: Vec<InstanceReport>,
}
