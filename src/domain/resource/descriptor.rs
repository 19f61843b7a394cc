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
use crate::shared::error::{HarnessError, Result};
use k8s_openapi::api::core::v1::{Namespace, Pod, Service};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde_json::Value;
use std::fmt;

/// Identity of a remote resource: (kind, namespace, name)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceId {
    pub kind: ResourceKind,
    pub namespace: Option<String>,
    pub name: String,
}

impl ResourceId {
    pub fn new(kind: ResourceKind, namespace: Option<String>, name: impl Into<String>) -> Self {
        Self {
            kind,
            namespace,
            name: name.into(),
        }
    }

    pub fn namespace(name: impl Into<String>) -> Self {
        Self::new(ResourceKind::Namespace, None, name)
    }

    pub fn namespaced(
        kind: ResourceKind,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self::new(kind, Some(namespace.into()), name)
    }

    /// Namespace as it appears in error messages; empty for cluster-scoped kinds
    pub fn namespace_or_empty(&self) -> &str {
        self.namespace.as_deref().unwrap_or("")
    }

    /// Namespace for namespaced kinds, failing when it is missing
    pub fn require_namespace(&self) -> Result<&str> {
        self.namespace.as_deref().ok_or_else(|| {
            HarnessError::InvalidResource(format!(
                "{} '{}' requires a namespace",
                self.kind, self.name
            ))
        })
    }

    pub fn not_found(&self) -> HarnessError {
        HarnessError::not_found(self.kind.as_str(), &self.name, self.namespace_or_empty())
    }

    pub fn already_exists(&self) -> HarnessError {
        HarnessError::already_exists(self.kind.as_str(), &self.name, self.namespace_or_empty())
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{} {}/{}", self.kind, ns, self.name),
            None => write!(f, "{} {}", self.kind, self.name),
        }
    }
}

/// Desired spec of a resource, one typed object per supported kind
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceSpec {
    Namespace(Box<Namespace>),
    Pod(Box<Pod>),
    Service(Box<Service>),
    Route(Box<Route>),
}

impl ResourceSpec {
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceSpec::Namespace(_) => ResourceKind::Namespace,
            ResourceSpec::Pod(_) => ResourceKind::Pod,
            ResourceSpec::Service(_) => ResourceKind::Service,
            ResourceSpec::Route(_) => ResourceKind::Route,
        }
    }

    fn metadata(&self) -> &ObjectMeta {
        match self {
            ResourceSpec::Namespace(ns) => &ns.metadata,
            ResourceSpec::Pod(pod) => &pod.metadata,
            ResourceSpec::Service(svc) => &svc.metadata,
            ResourceSpec::Route(route) => &route.metadata,
        }
    }
}

/// A resource to be submitted to the cluster. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceDescriptor {
    id: ResourceId,
    spec: ResourceSpec,
}

impl ResourceDescriptor {
    pub fn new(spec: ResourceSpec) -> Result<Self> {
        let kind = spec.kind();
        let metadata = spec.metadata();

        let name = metadata
            .name
            .clone()
            .filter(|n| !n.is_empty())
            .ok_or_else(|| {
                HarnessError::InvalidResource(format!("{} manifest is missing metadata.name", kind))
            })?;

        let namespace = if kind.is_namespaced() {
            let ns = metadata
                .namespace
                .clone()
                .filter(|n| !n.is_empty())
                .ok_or_else(|| {
                    HarnessError::InvalidResource(format!(
                        "{} '{}' is missing metadata.namespace",
                        kind, name
                    ))
                })?;
            Some(ns)
        } else {
            None
        };

        Ok(Self {
            id: ResourceId::new(kind, namespace, name),
            spec,
        })
    }

    pub fn namespace(name: &str) -> Result<Self> {
        Self::new(ResourceSpec::Namespace(Box::new(Namespace {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                ..Default::default()
            },
            ..Default::default()
        })))
    }

    pub fn route(route: Route) -> Result<Self> {
        Self::new(ResourceSpec::Route(Box::new(route)))
    }

    /// Parse a rendered manifest, dispatching on its `kind` field.
    pub fn from_manifest(manifest: &str) -> Result<Self> {
        let value: Value = serde_yaml::from_str(manifest)?;

        let kind = value
            .get("kind")
            .and_then(Value::as_str)
            .ok_or_else(|| HarnessError::InvalidResource("Manifest is missing kind".to_string()))?
            .parse::<ResourceKind>()?;

        let spec = match kind {
            ResourceKind::Namespace => ResourceSpec::Namespace(Box::new(typed(value, kind)?)),
            ResourceKind::Pod => ResourceSpec::Pod(Box::new(typed(value, kind)?)),
            ResourceKind::Service => ResourceSpec::Service(Box::new(typed(value, kind)?)),
            ResourceKind::Route => ResourceSpec::Route(Box::new(typed(value, kind)?)),
        };

        Self::new(spec)
    }

    pub fn id(&self) -> &ResourceId {
        &self.id
    }

    pub fn kind(&self) -> ResourceKind {
        self.id.kind
    }

    pub fn name(&self) -> &str {
        &self.id.name
    }

    pub fn namespace_name(&self) -> Option<&str> {
        self.id.namespace.as_deref()
    }

    pub fn spec(&self) -> &ResourceSpec {
        &self.spec
    }

    /// Manifest with `apiVersion` and `kind` set, as submitted to the cluster
    pub fn to_manifest_value(&self) -> Result<Value> {
        let mut value = match &self.spec {
            ResourceSpec::Namespace(ns) => serde_json::to_value(ns.as_ref())?,
            ResourceSpec::Pod(pod) => serde_json::to_value(pod.as_ref())?,
            ResourceSpec::Service(svc) => serde_json::to_value(svc.as_ref())?,
            ResourceSpec::Route(route) => serde_json::to_value(route.as_ref())?,
        };
        if let Some(obj) = value.as_object_mut() {
            obj.insert(
                "apiVersion".to_string(),
                Value::String(self.kind().api_version()),
            );
            obj.insert(
                "kind".to_string(),
                Value::String(self.kind().as_str().to_string()),
            );
        }
        Ok(value)
    }
}

fn typed<T: serde::de::DeserializeOwned>(value: Value, kind: ResourceKind) -> Result<T> {
    serde_json::from_value(value).map_err(|e| {
        HarnessError::InvalidResource(format!("Failed to parse {} manifest: {}", kind, e))
    })
}
