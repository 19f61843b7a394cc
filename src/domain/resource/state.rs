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

use crate::domain::resource::kind::ResourceKind;
use crate::domain::resource::route::Route;
use serde_json::Value;
use std::fmt;

/// Observed state of a remote resource, as reported by the cluster
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceState(String);

impl ResourceState {
    pub const ACTIVE: &'static str = "Active";
    pub const TERMINATING: &'static str = "Terminating";
    pub const PENDING: &'static str = "Pending";
    pub const RUNNING: &'static str = "Running";
    pub const SUCCEEDED: &'static str = "Succeeded";
    pub const FAILED: &'static str = "Failed";
    pub const UNKNOWN: &'static str = "Unknown";
    pub const READY: &'static str = "Ready";
    pub const ADMITTED: &'static str = "Admitted";

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn active() -> Self {
        Self::new(Self::ACTIVE)
    }

    pub fn running() -> Self {
        Self::new(Self::RUNNING)
    }

    pub fn pending() -> Self {
        Self::new(Self::PENDING)
    }

    pub fn failed() -> Self {
        Self::new(Self::FAILED)
    }

    pub fn succeeded() -> Self {
        Self::new(Self::SUCCEEDED)
    }

    pub fn ready() -> Self {
        Self::new(Self::READY)
    }

    pub fn admitted() -> Self {
        Self::new(Self::ADMITTED)
    }

    pub fn unknown() -> Self {
        Self::new(Self::UNKNOWN)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derive the observed state from a remote object rendered as JSON.
    pub fn observe(kind: ResourceKind, object: &Value) -> Self {
        match kind {
            ResourceKind::Namespace | ResourceKind::Pod => object
                .pointer("/status/phase")
                .and_then(Value::as_str)
                .map(Self::new)
                .unwrap_or_else(Self::unknown),
            ResourceKind::Service => {
                let assigned = object
                    .pointer("/spec/clusterIP")
                    .and_then(Value::as_str)
                    .is_some_and(|ip| !ip.is_empty());
                if assigned {
                    Self::ready()
                } else {
                    Self::pending()
                }
            }
            ResourceKind::Route => match serde_json::from_value::<Route>(object.clone()) {
                Ok(route) if route.is_admitted() => Self::admitted(),
                Ok(_) => Self::pending(),
                Err(_) => Self::unknown(),
            },
        }
    }
}

impl fmt::Display for ResourceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceState {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ResourceState {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl PartialEq<&str> for ResourceState {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pod_phase() {
        let pod = json!({"status": {"phase": "Running"}});
        assert_eq!(
            ResourceState::observe(ResourceKind::Pod, &pod),
            ResourceState::running()
        );
        let pending = json!({"metadata": {"name": "nginx"}});
        assert_eq!(
            ResourceState::observe(ResourceKind::Pod, &pending),
            ResourceState::unknown()
        );
    }

    #[test]
    fn test_namespace_phase() {
        let ns = json!({"status": {"phase": "Terminating"}});
        assert_eq!(
            ResourceState::observe(ResourceKind::Namespace, &ns),
            ResourceState::TERMINATING
        );
    }

    #[test]
    fn test_service_ready_once_cluster_ip_assigned() {
        let svc = json!({"spec": {"clusterIP": "172.30.12.4", "type": "NodePort"}});
        assert_eq!(
            ResourceState::observe(ResourceKind::Service, &svc),
            ResourceState::ready()
        );
        let svc = json!({"spec": {"clusterIP": ""}});
        assert_eq!(
            ResourceState::observe(ResourceKind::Service, &svc),
            ResourceState::pending()
        );
    }

    #[test]
    fn test_route_admission() {
        let route = json!({
            "metadata": {"name": "nginx-route"},
            "spec": {"to": {"kind": "Service", "name": "svc"}},
            "status": {"ingress": [{"conditions": [{"type": "Admitted", "status": "True"}]}]}
        });
        assert_eq!(
            ResourceState::observe(ResourceKind::Route, &route),
            ResourceState::admitted()
        );

        let unadmitted = json!({
            "metadata": {"name": "nginx-route"},
            "spec": {"to": {"kind": "Service", "name": "svc"}},
            "status": {"ingress": [{"conditions": [{"type": "Admitted", "status": "False"}]}]}
        });
        assert_eq!(
            ResourceState::observe(ResourceKind::Route, &unadmitted),
            ResourceState::pending()
        );
    }

    #[test]
    fn test_compare_with_str() {
        assert!(ResourceState::active() == "Active");
        assert_eq!(ResourceState::from("Running").to_string(), "Running");
    }
}
