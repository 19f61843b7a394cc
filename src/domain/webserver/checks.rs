// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Checks run against a ready webserver chain.

use crate::domain::chain::ChainHandles;
use crate::domain::config::HarnessConfig;
use crate::domain::resource::{ResourceState, Route};
use crate::domain::webserver::chain::{NAMESPACE_STEP, POD_STEP, ROUTE_STEP, SERVICE_STEP};
use crate::infrastructure::http;
use crate::shared::error::{HarnessError, Result};
use serde_json::Value;
use std::fmt;
use tracing::{error, info, warn};

pub const NAMESPACE_ACTIVE: &str = "namespace-active";
pub const POD_STATUS: &str = "pod-status";
pub const POD_LOGS: &str = "pod-logs";
pub const SERVICE: &str = "service";
pub const ROUTE: &str = "route";
pub const GET_REQUEST: &str = "get-request";
pub const POD_PROXY: &str = "pod-proxy";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Passed,
    Failed,
    Skipped,
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckStatus::Passed => f.write_str("passed"),
            CheckStatus::Failed => f.write_str("failed"),
            CheckStatus::Skipped => f.write_str("skipped"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub name: &'static str,
    pub status: CheckStatus,
    pub detail: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport {
    pub results: Vec<CheckResult>,
}

impl CheckReport {
    pub fn get(&self, name: &str) -> Option<&CheckResult> {
        self.results.iter().find(|r| r.name == name)
    }

    pub fn status(&self, name: &str) -> Option<CheckStatus> {
        self.get(name).map(|r| r.status)
    }

    pub fn passed(&self, name: &str) -> bool {
        self.status(name) == Some(CheckStatus::Passed)
    }

    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.status == CheckStatus::Passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckResult> {
        self.results
            .iter()
            .filter(|r| r.status == CheckStatus::Failed)
    }

    fn record(&mut self, name: &'static str, outcome: Result<String>) {
        let (status, detail) = match outcome {
            Ok(detail) => {
                info!(check = name, detail = %detail, "Check passed");
                (CheckStatus::Passed, detail)
            }
            Err(e) => {
                error!(check = name, error = %e, "Check failed");
                (CheckStatus::Failed, e.to_string())
            }
        };
        self.results.push(CheckResult {
            name,
            status,
            detail,
        });
    }

    /// True when `dependency` passed; otherwise records `name` as skipped.
    fn gate(&mut self, name: &'static str, dependency: &str) -> bool {
        if self.passed(dependency) {
            return true;
        }
        warn!(check = name, dependency, "Skipping check");
        self.results.push(CheckResult {
            name,
            status: CheckStatus::Skipped,
            detail: format!("requires {}", dependency),
        });
        false
    }
}

/// Run every check in dependency order. Individual failures are recorded in
/// the report rather than returned.
pub async fn run_checks(handles: &mut ChainHandles, config: &HarnessConfig) -> CheckReport {
    let mut report = CheckReport::default();

    report.record(NAMESPACE_ACTIVE, namespace_active(handles).await);
    report.record(POD_STATUS, pod_status(handles).await);
    report.record(POD_LOGS, pod_logs(handles).await);

    if report.gate(SERVICE, POD_STATUS) {
        report.record(SERVICE, service(handles).await);
    }

    let mut host = None;
    if report.gate(ROUTE, SERVICE) {
        let outcome = route_host(handles).await;
        if let Ok(h) = &outcome {
            host = Some(h.clone());
        }
        report.record(ROUTE, outcome.map(|h| format!("host {}", h)));
    }

    if report.gate(GET_REQUEST, ROUTE) {
        if let Some(host) = host {
            report.record(GET_REQUEST, get_request(&host, config.route.port).await);
        }
    }

    if report.gate(POD_PROXY, POD_STATUS) {
        report.record(POD_PROXY, pod_proxy(handles).await);
    }

    report
}

async fn namespace_active(handles: &mut ChainHandles) -> Result<String> {
    let ns = handles.require_mut(NAMESPACE_STEP)?;
    let state = ns.refresh_status().await?;
    if state == ResourceState::ACTIVE {
        Ok(format!("{} is {}", ns.name(), state))
    } else {
        Err(unexpected(ns.name(), ResourceState::ACTIVE, &state))
    }
}

async fn pod_status(handles: &mut ChainHandles) -> Result<String> {
    let pod = handles.require_mut(POD_STEP)?;
    let state = pod.refresh_status().await?;
    if state == ResourceState::FAILED || state == ResourceState::PENDING {
        return Err(unexpected(pod.name(), ResourceState::RUNNING, &state));
    }
    Ok(format!("{} is {}", pod.name(), state))
}

async fn pod_logs(handles: &ChainHandles) -> Result<String> {
    let pod = handles.require(POD_STEP)?;
    let logs = pod.logs().await?;
    info!(pod = %pod.name(), logs = %logs, "Pod logs");
    Ok(format!("{} lines", logs.lines().count()))
}

async fn service(handles: &ChainHandles) -> Result<String> {
    let svc = handles.require(SERVICE_STEP)?;
    let object = svc.fetch().await?;

    let service_type = object
        .pointer("/spec/type")
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string();
    let ip_families = object
        .pointer("/spec/ipFamilies")
        .and_then(Value::as_array)
        .map(|families| {
            families
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(",")
        })
        .unwrap_or_default();

    info!(service = %svc.name(), service_type = %service_type, ip_families = %ip_families, "Service details");
    Ok(format!("type {}, ip families [{}]", service_type, ip_families))
}

async fn route_host(handles: &ChainHandles) -> Result<String> {
    let route = handles.require(ROUTE_STEP)?;
    let object: Route = serde_json::from_value(route.fetch().await?)?;
    object.host().map(str::to_string).ok_or_else(|| {
        HarnessError::InvalidResource(format!("{} does not expose a host", route.id()))
    })
}

async fn get_request(host: &str, port: u16) -> Result<String> {
    let url = http::route_url(host, port);
    let response = http::get(&url).await?;
    if response.is_success() {
        Ok(format!("GET {} returned {}", url, response.status))
    } else {
        Err(HarnessError::Http(format!(
            "GET {} returned {}",
            url, response.status
        )))
    }
}

async fn pod_proxy(handles: &ChainHandles) -> Result<String> {
    let pod = handles.require(POD_STEP)?;
    let body = pod.proxy_get("/").await?;
    if body.trim().is_empty() {
        return Err(HarnessError::Http(format!(
            "Proxy GET to {} returned an empty body",
            pod.id()
        )));
    }
    Ok(format!("{} bytes through the pod proxy", body.len()))
}

fn unexpected(name: &str, expected: &str, observed: &ResourceState) -> HarnessError {
    HarnessError::Validation(format!(
        "{} is {} (expected {})",
        name, observed, expected
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_skips_when_dependency_failed() {
        let mut report = CheckReport::default();
        report.record(POD_STATUS, Err(HarnessError::Remote("down".to_string())));
        assert!(!report.gate(SERVICE, POD_STATUS));
        assert_eq!(report.status(SERVICE), Some(CheckStatus::Skipped));
        assert_eq!(report.failures().count(), 1);
        assert!(!report.all_passed());
    }

    #[test]
    fn test_gate_passes_when_dependency_passed() {
        let mut report = CheckReport::default();
        report.record(POD_STATUS, Ok("nginx is Running".to_string()));
        assert!(report.gate(SERVICE, POD_STATUS));
        assert!(report.get(SERVICE).is_none());
        assert!(report.all_passed());
    }
}
