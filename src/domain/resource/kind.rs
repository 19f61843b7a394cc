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

use crate::infrastructure::constants::{ROUTE_GROUP, ROUTE_VERSION};
use crate::shared::error::HarnessError;
use std::fmt;

/// Resource kinds the harness knows how to manage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Namespace,
    Pod,
    Service,
    Route,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Namespace => "Namespace",
            ResourceKind::Pod => "Pod",
            ResourceKind::Service => "Service",
            ResourceKind::Route => "Route",
        }
    }

    pub fn api_version(&self) -> String {
        match self {
            ResourceKind::Namespace | ResourceKind::Pod | ResourceKind::Service => {
                "v1".to_string()
            }
            ResourceKind::Route => format!("{}/{}", ROUTE_GROUP, ROUTE_VERSION),
        }
    }

    pub fn is_namespaced(&self) -> bool {
        !matches!(self, ResourceKind::Namespace)
    }

    /// Whether the API server exposes a `/proxy` subresource for this kind
    pub fn supports_proxy(&self) -> bool {
        matches!(self, ResourceKind::Pod | ResourceKind::Service)
    }

    pub fn supports_logs(&self) -> bool {
        matches!(self, ResourceKind::Pod)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ResourceKind {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Namespace" => Ok(ResourceKind::Namespace),
            "Pod" => Ok(ResourceKind::Pod),
            "Service" => Ok(ResourceKind::Service),
            "Route" => Ok(ResourceKind::Route),
            _ => Err(HarnessError::InvalidResource(format!(
                "Unsupported resource kind: {}",
                s
            ))),
        }
    }
}
