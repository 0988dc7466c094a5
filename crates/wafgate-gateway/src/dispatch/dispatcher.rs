use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use wafgate_core::error::{Result, WafGateError};
use wafgate_core::pattern::{challenge_pattern, Pattern};
use wafgate_core::report::{InstanceReport, PolicyStatus, SiteResult};

use crate::config::{GatewayConfig, InstanceConfig, InstanceDescriptor};
use crate::vendor::{ChallengeSwitch, Connector, WafApi};

use super::fanout::{join_ordered, within};

/// Which site switch a dispatch performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchKind {
    Policy,
    Challenge,
}

impl SwitchKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SwitchKind::Policy => "policy",
            SwitchKind::Challenge => "challenge",
        }
    }
}

/// Fans a switch or status read out over every instance and site of a group.
///
/// Only an unknown or empty group fails the call; everything below that is
/// reported per unit.
#[derive(Clone)]
pub struct GroupDispatcher {
    groups: Arc<BTreeMap<String, Vec<InstanceConfig>>>,
    connector: Arc<dyn Connector>,
    max_in_flight: usize,
    unit_deadline: Duration,
}

impl GroupDispatcher {
    pub fn new(cfg: &GatewayConfig, connector: Arc<dyn Connector>) -> Self {
        Self {
            groups: Arc::new(cfg.groups.clone()),
            connector,
            max_in_flight: cfg.dispatch.max_in_flight,
            unit_deadline: cfg.dispatch.unit_deadline(),
        }
    }

    pub fn group_names(&self) -> Vec<&str> {
        self.groups.keys().map(String::as_str).collect()
    }

    fn resolve(&self, group: &str) -> Result<&[InstanceConfig]> {
        match self.groups.get(group) {
            Some(instances) if !instances.is_empty() => Ok(instances.as_slice()),
            _ => Err(WafGateError::NotFound(group.to_string())),
        }
    }

    /// Enable/disable the policy or challenge on every site of `group`.
    pub async fn apply(
        &self,
        group: &str,
        enable: bool,
        kind: SwitchKind,
    ) -> Result<Vec<InstanceReport>> {
        let instances = self.resolve(group)?;
        tracing::info!(group, enable, mode = kind.as_str(), instances = instances.len(), "dispatch start");

        let names = display_names(group, instances);
        let jobs: Vec<_> = instances
            .iter()
            .enumerate()
            .map(|(idx, inst)| {
                let this = self.clone();
                let group = group.to_string();
                let inst = inst.clone();
                async move { this.apply_instance(&group, idx, &inst, enable, kind).await }
            })
            .collect();

        let reports = join_ordered(jobs, self.max_in_flight, |idx, e| {
            aborted_instance(&names[idx], e)
        })
        .await;

        log_finish(group, kind.as_str(), &reports);
        Ok(reports)
    }

    /// Read enablement of every configured policy in `group`.
    pub async fn status(&self, group: &str) -> Result<Vec<InstanceReport>> {
        let instances = self.resolve(group)?;
        tracing::info!(group, mode = "status", instances = instances.len(), "dispatch start");

        let names = display_names(group, instances);
        let jobs: Vec<_> = instances
            .iter()
            .enumerate()
            .map(|(idx, inst)| {
                let this = self.clone();
                let group = group.to_string();
                let inst = inst.clone();
                async move { this.status_instance(&group, idx, &inst).await }
            })
            .collect();

        let reports = join_ordered(jobs, self.max_in_flight, |idx, e| {
            aborted_instance(&names[idx], e)
        })
        .await;

        log_finish(group, "status", &reports);
        Ok(reports)
    }

    /// Bind a client to a checked entry, or report why the instance was skipped.
    fn bind(
        &self,
        group: &str,
        idx: usize,
        inst: &InstanceConfig,
        checked: Result<InstanceDescriptor>,
    ) -> std::result::Result<(InstanceDescriptor, Arc<dyn WafApi>), InstanceReport> {
        let bound = checked.and_then(|desc| self.connector.connect(&desc).map(|api| (desc, api)));

        bound.map_err(|e| {
            let name = inst.display_name(group, idx);
            tracing::error!(group, waf = %name, error = %e, "error processing WAF instance");
            InstanceReport::failed(name, &e)
        })
    }

    async fn apply_instance(
        &self,
        group: &str,
        idx: usize,
        inst: &InstanceConfig,
        enable: bool,
        kind: SwitchKind,
    ) -> InstanceReport {
        let (desc, api) = match self.bind(group, idx, inst, inst.descriptor()) {
            Ok(bound) => bound,
            Err(report) => return report,
        };

        let pattern = match kind {
            SwitchKind::Challenge => challenge_pattern(enable, &desc.url_rules),
            SwitchKind::Policy => Vec::new(),
        };

        let deadline = self.unit_deadline;
        let jobs: Vec<_> = desc
            .site_ids
            .iter()
            .map(|&site_id| {
                switch_site(
                    Arc::clone(&api),
                    desc.name.clone(),
                    site_id,
                    enable,
                    kind,
                    pattern.clone(),
                    deadline,
                )
            })
            .collect();

        let site_ids = desc.site_ids.clone();
        let results = join_ordered(jobs, self.max_in_flight, |i, e| {
            SiteResult::failure(site_ids[i], &WafGateError::Internal(format!("site task failed: {e}")))
        })
        .await;

        InstanceReport::sites(desc.name, results)
    }

    async fn status_instance(&self, group: &str, idx: usize, inst: &InstanceConfig) -> InstanceReport {
        let (desc, api) = match self.bind(group, idx, inst, inst.status_descriptor()) {
            Ok(bound) => bound,
            Err(report) => return report,
        };

        let deadline = self.unit_deadline;
        let jobs: Vec<_> = desc
            .policy_ids
            .iter()
            .map(|&policy_id| read_policy(Arc::clone(&api), desc.name.clone(), policy_id, deadline))
            .collect();

        let policy_ids = desc.policy_ids.clone();
        let policies = join_ordered(jobs, self.max_in_flight, |i, e| {
            PolicyStatus::failure(policy_ids[i], &WafGateError::Internal(format!("policy task failed: {e}")))
        })
        .await;

        InstanceReport::policies(desc.name, policies)
    }
}

async fn switch_site(
    api: Arc<dyn WafApi>,
    waf: String,
    site_id: u64,
    enable: bool,
    kind: SwitchKind,
    pattern: Pattern,
    deadline: Duration,
) -> SiteResult {
    let call = async {
        match kind {
            SwitchKind::Challenge => {
                tracing::info!(waf = %waf, site_id, enable, pattern = ?pattern, "configuring challenge");
                let req = ChallengeSwitch::new(site_id, enable).with_pattern(pattern);
                api.switch_challenge(&req).await
            }
            SwitchKind::Policy => {
                tracing::info!(waf = %waf, site_id, enable, "switching policy");
                api.switch_policy(site_id, enable).await
            }
        }
    };

    match within(deadline, call).await {
        Ok(body) => {
            tracing::info!(waf = %waf, site_id, enable, mode = kind.as_str(), "site switched");
            SiteResult::success(site_id, body)
        }
        Err(e) => {
            tracing::error!(waf = %waf, site_id, enable, mode = kind.as_str(), error = %e, details = e.details().unwrap_or(""), "site switch failed");
            SiteResult::failure(site_id, &e)
        }
    }
}

async fn read_policy(
    api: Arc<dyn WafApi>,
    waf: String,
    policy_id: u64,
    deadline: Duration,
) -> PolicyStatus {
    match within(deadline, api.get_policy_detail(policy_id)).await {
        Ok(detail) => {
            let status = PolicyStatus::read(policy_id, &detail);
            tracing::debug!(waf = %waf, policy_id, state = ?status.state, "policy status read");
            status
        }
        Err(e) => {
            tracing::error!(waf = %waf, policy_id, error = %e, "error getting policy status");
            PolicyStatus::failure(policy_id, &e)
        }
    }
}

fn display_names(group: &str, instances: &[InstanceConfig]) -> Vec<String> {
    instances
        .iter()
        .enumerate()
        .map(|(idx, inst)| inst.display_name(group, idx))
        .collect()
}

fn aborted_instance(name: &str, e: tokio::task::JoinError) -> InstanceReport {
    tracing::error!(waf = %name, error = %e, "instance task aborted");
    InstanceReport::failed(name, &WafGateError::Internal(format!("instance task failed: {e}")))
}

fn log_finish(group: &str, mode: &str, reports: &[InstanceReport]) {
    let failed = reports.iter().filter(|r| r.is_failed()).count();
    let site_errors = reports
        .iter()
        .flat_map(|r| r.site_results())
        .filter(|s| !s.is_success())
        .count();
    tracing::info!(group, mode, instances = reports.len(), failed_instances = failed, site_errors, "dispatch finished");
}
