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

use crate::infrastructure::constants::{
    DEFAULT_CONTAINER_PORT, DEFAULT_HTTP_PORT, DEFAULT_POLL_INTERVAL_MS, DEFAULT_ROUTE_NAME,
    DEFAULT_TEMPLATE_DIR, DEFAULT_TEMPLATE_FILE, OPERATOR_ENV_VAR, SERVICE_READY_TIMEOUT,
    SERVICE_TYPES, TIMEOUT_4MIN, WEBSERVER_NAME_PREFIX,
};
use crate::shared::error::{HarnessError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Operator identity, taken from the environment rather than the file
    #[serde(skip)]
    pub operator: String,
    pub cluster: ClusterSection,
    pub template: TemplateSection,
    pub service: ServiceSection,
    pub route: RouteSection,
    pub timeouts: TimeoutSection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterSection {
    pub kubeconfig: Option<String>,
    pub context: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateSection {
    pub dir: PathBuf,
    pub file: String,
    pub image: Option<String>,
    pub container_port: u16,
    pub node_name: Option<String>,
}

impl Default for TemplateSection {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_TEMPLATE_DIR),
            file: DEFAULT_TEMPLATE_FILE.to_string(),
            image: None,
            container_port: DEFAULT_CONTAINER_PORT,
            node_name: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceType {
    ClusterIP,
    #[default]
    NodePort,
    LoadBalancer,
}

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::ClusterIP => "ClusterIP",
            ServiceType::NodePort => "NodePort",
            ServiceType::LoadBalancer => "LoadBalancer",
        }
    }
}

impl std::fmt::Display for ServiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ServiceType {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ClusterIP" => Ok(ServiceType::ClusterIP),
            "NodePort" => Ok(ServiceType::NodePort),
            "LoadBalancer" => Ok(ServiceType::LoadBalancer),
            _ => Err(HarnessError::Validation(format!(
                "Invalid service type: {} (expected one of {})",
                s,
                SERVICE_TYPES.join(", ")
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSection {
    #[serde(rename = "type")]
    pub service_type: ServiceType,
    pub port: u16,
}

impl Default for ServiceSection {
    fn default() -> Self {
        Self {
            service_type: ServiceType::default(),
            port: DEFAULT_HTTP_PORT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteSection {
    pub name: String,
    /// Port the GET request is sent to on the route host
    pub port: u16,
}

impl Default for RouteSection {
    fn default() -> Self {
        Self {
            name: DEFAULT_ROUTE_NAME.to_string(),
            port: DEFAULT_HTTP_PORT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutSection {
    pub namespace_secs: u64,
    pub pod_secs: u64,
    pub service_secs: u64,
    pub route_secs: u64,
    pub poll_interval_ms: u64,
}

impl Default for TimeoutSection {
    fn default() -> Self {
        Self {
            namespace_secs: TIMEOUT_4MIN,
            pod_secs: TIMEOUT_4MIN,
            service_secs: SERVICE_READY_TIMEOUT,
            route_secs: TIMEOUT_4MIN,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl TimeoutSection {
    pub fn namespace(&self) -> Duration {
        Duration::from_secs(self.namespace_secs)
    }

    pub fn pod(&self) -> Duration {
        Duration::from_secs(self.pod_secs)
    }

    pub fn service(&self) -> Duration {
        Duration::from_secs(self.service_secs)
    }

    pub fn route(&self) -> Duration {
        Duration::from_secs(self.route_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl HarnessConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            HarnessError::config_error(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        debug!(path = %path.display(), "Loaded config file");
        Self::from_toml_str(&content)
    }

    /// Load `path` when given, otherwise start from defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from_file(p),
            None => Ok(Self::default()),
        }
    }

    /// Fill in the operator from `USER` unless one is already set.
    pub fn with_operator_from_env(mut self) -> Result<Self> {
        if self.operator.is_empty() {
            self.operator = operator_from_env()?;
        }
        Ok(self)
    }

    /// Per-operator base name, also used as the namespace name
    pub fn namespace_name(&self) -> String {
        format!("{}-{}", WEBSERVER_NAME_PREFIX, self.operator)
    }

    pub fn validate(&self) -> Result<()> {
        if self.operator.trim().is_empty() {
            return Err(HarnessError::config_error(format!(
                "{} must be set to a non-empty operator name",
                OPERATOR_ENV_VAR
            )));
        }

        let namespace = self.namespace_name();
        if !is_valid_k8s_name(&namespace) || namespace.len() > 63 {
            return Err(HarnessError::Validation(format!(
                "Namespace name '{}' is not a valid DNS-1123 label; check {}",
                namespace, OPERATOR_ENV_VAR
            )));
        }

        if !is_valid_k8s_name(&self.route.name) {
            return Err(HarnessError::Validation(format!(
                "Invalid route name: {}",
                self.route.name
            )));
        }

        if self.template.file.trim().is_empty() {
            return Err(HarnessError::Validation(
                "template.file must not be empty".to_string(),
            ));
        }

        for (field, port) in [
            ("template.container_port", self.template.container_port),
            ("service.port", self.service.port),
            ("route.port", self.route.port),
        ] {
            if port == 0 {
                return Err(HarnessError::Validation(format!("{} must be > 0", field)));
            }
        }

        let t = &self.timeouts;
        for (field, value) in [
            ("timeouts.namespace_secs", t.namespace_secs),
            ("timeouts.pod_secs", t.pod_secs),
            ("timeouts.service_secs", t.service_secs),
            ("timeouts.route_secs", t.route_secs),
            ("timeouts.poll_interval_ms", t.poll_interval_ms),
        ] {
            if value == 0 {
                return Err(HarnessError::Validation(format!("{} must be > 0", field)));
            }
        }

        Ok(())
    }
}

pub fn operator_from_env() -> Result<String> {
    match std::env::var(OPERATOR_ENV_VAR) {
        Ok(user) if !user.trim().is_empty() => Ok(user.trim().to_string()),
        _ => Err(HarnessError::config_error(format!(
            "{} environment variable is required to name the test resources",
            OPERATOR_ENV_VAR
        ))),
    }
}

fn dns_label() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$").ok())
        .as_ref()
}

pub(crate) fn is_valid_k8s_name(name: &str) -> bool {
    !name.is_empty() && name.len() <= 253 && dns_label().is_some_and(|re| re.is_match(name))
}
