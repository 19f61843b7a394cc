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

//! Typed `route.openshift.io/v1` Route.
//!
//! k8s-openapi only ships upstream Kubernetes types, so the subset of the
//! OpenShift Route schema the harness reads and writes lives here.

use crate::infrastructure::constants::ROUTE_CONDITION_ADMITTED;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Route {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: RouteSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RouteStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub to: RouteTargetReference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<RoutePort>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteTargetReference {
    pub kind: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<i32>,
}

impl Default for RouteTargetReference {
    fn default() -> Self {
        Self {
            kind: "Service".to_string(),
            name: String::new(),
            weight: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePort {
    pub target_port: IntOrString,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteStatus {
    #[serde(default)]
    pub ingress: Vec<RouteIngress>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteIngress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub router_name: Option<String>,
    #[serde(default)]
    pub conditions: Vec<RouteIngressCondition>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteIngressCondition {
    #[serde(rename = "type")]
    pub type_: String,
    pub status: String,
}

impl Route {
    /// Route exposing `service` on the router's generated host
    pub fn to_service(name: &str, namespace: &str, service: &str) -> Self {
        Self {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some(namespace.to_string()),
                ..Default::default()
            },
            spec: RouteSpec {
                to: RouteTargetReference {
                    name: service.to_string(),
                    ..Default::default()
                },
                ..Default::default()
            },
            status: None,
        }
    }

    pub fn with_target_port(mut self, port: IntOrString) -> Self {
        self.spec.port = Some(RoutePort { target_port: port });
        self
    }

    /// Host the route is reachable on, preferring the spec over router status
    pub fn host(&self) -> Option<&str> {
        self.spec.host.as_deref().filter(|h| !h.is_empty()).or_else(|| {
            self.status
                .as_ref()
                .and_then(|s| s.ingress.iter().find_map(|i| i.host.as_deref()))
        })
    }

    pub fn is_admitted(&self) -> bool {
        self.status.as_ref().is_some_and(|s| {
            s.ingress.iter().any(|i| {
                i.conditions
                    .iter()
                    .any(|c| c.type_ == ROUTE_CONDITION_ADMITTED && c.status == "True")
            })
        })
    }
}
