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

use crate::domain::resource::{
    ResourceDescriptor, ResourceId, ResourceKind, ResourceSpec, ResourceState,
};
use crate::infrastructure::constants::{
    READ_RETRY_MAX_TIMES, READ_RETRY_MIN_DELAY_MS, ROUTE_GROUP, ROUTE_VERSION,
};
use crate::shared::error::{HarnessError, Result};
use backon::{ExponentialBuilder, Retryable};
use k8s_openapi::api::core::v1::{Namespace, Pod, Service};
use kube::api::{DeleteParams, LogParams, PostParams};
use kube::core::{ApiResource, DynamicObject, GroupVersionKind};
use kube::{Api, Client};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt::Debug;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Operations the harness performs against the cluster, keyed by resource identity.
#[async_trait::async_trait]
pub trait RemoteApi: Send + Sync {
    /// Submit a descriptor and return the object as stored by the server.
    async fn create(&self, descriptor: &ResourceDescriptor) -> Result<Value>;

    async fn delete(&self, id: &ResourceId) -> Result<()>;

    async fn get(&self, id: &ResourceId) -> Result<Value>;

    async fn status(&self, id: &ResourceId) -> Result<ResourceState> {
        let object = self.get(id).await?;
        Ok(ResourceState::observe(id.kind, &object))
    }

    async fn logs(&self, id: &ResourceId) -> Result<String>;

    /// GET `path` through the API server proxy subresource of a Pod or Service.
    async fn proxy_get(&self, id: &ResourceId, path: &str) -> Result<String>;
}

pub struct KubeRemoteApi {
    client: Client,
}

impl KubeRemoteApi {
    pub async fn new() -> Result<Self> {
        let client = Client::try_default().await.map_err(|e| {
            HarnessError::Remote(format!("Failed to create Kubernetes client: {}", e))
        })?;

        Ok(Self { client })
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    pub async fn new_with_config(
        kubeconfig_path: Option<String>,
        context: Option<String>,
    ) -> Result<Self> {
        use kube::config::{KubeConfigOptions, Kubeconfig};

        if kubeconfig_path.is_none() && context.is_none() {
            return Self::new().await;
        }

        let kubeconfig = if let Some(path) = kubeconfig_path {
            Kubeconfig::read_from(path)
                .map_err(|e| HarnessError::config_error(format!("Failed to load kubeconfig: {}", e)))?
        } else {
            Kubeconfig::read()
                .map_err(|e| HarnessError::config_error(format!("Failed to load kubeconfig: {}", e)))?
        };

        let config_options = KubeConfigOptions {
            context,
            cluster: None,
            user: None,
        };

        let config = kube::Config::from_custom_kubeconfig(kubeconfig, &config_options)
            .await
            .map_err(|e| {
                HarnessError::config_error(format!("Failed to create Kubernetes config: {}", e))
            })?;

        let client = Client::try_from(config).map_err(|e| {
            HarnessError::Remote(format!("Failed to create Kubernetes client: {}", e))
        })?;

        Ok(Self { client })
    }

    fn namespaces(&self) -> Api<Namespace> {
        Api::all(self.client.clone())
    }

    fn pods(&self, id: &ResourceId) -> Result<Api<Pod>> {
        Ok(Api::namespaced(self.client.clone(), id.require_namespace()?))
    }

    fn services(&self, id: &ResourceId) -> Result<Api<Service>> {
        Ok(Api::namespaced(self.client.clone(), id.require_namespace()?))
    }

    fn routes(&self, id: &ResourceId) -> Result<Api<DynamicObject>> {
        let gvk = GroupVersionKind::gvk(ROUTE_GROUP, ROUTE_VERSION, ResourceKind::Route.as_str());
        let resource = ApiResource::from_gvk(&gvk);
        Ok(Api::namespaced_with(
            self.client.clone(),
            id.require_namespace()?,
            &resource,
        ))
    }
}

#[async_trait::async_trait]
impl RemoteApi for KubeRemoteApi {
    async fn create(&self, descriptor: &ResourceDescriptor) -> Result<Value> {
        let id = descriptor.id();
        debug!(resource = %id, "Submitting resource");

        match descriptor.spec() {
            ResourceSpec::Namespace(ns) => create_in(self.namespaces(), ns.as_ref(), id).await,
            ResourceSpec::Pod(pod) => create_in(self.pods(id)?, pod.as_ref(), id).await,
            ResourceSpec::Service(svc) => create_in(self.services(id)?, svc.as_ref(), id).await,
            ResourceSpec::Route(_) => {
                let object: DynamicObject = serde_json::from_value(descriptor.to_manifest_value()?)?;
                create_in(self.routes(id)?, &object, id).await
            }
        }
    }

    async fn delete(&self, id: &ResourceId) -> Result<()> {
        debug!(resource = %id, "Deleting resource");

        match id.kind {
            ResourceKind::Namespace => delete_in(self.namespaces(), id).await,
            ResourceKind::Pod => delete_in(self.pods(id)?, id).await,
            ResourceKind::Service => delete_in(self.services(id)?, id).await,
            ResourceKind::Route => delete_in(self.routes(id)?, id).await,
        }
    }

    async fn get(&self, id: &ResourceId) -> Result<Value> {
        match id.kind {
            ResourceKind::Namespace => get_in(self.namespaces(), id).await,
            ResourceKind::Pod => get_in(self.pods(id)?, id).await,
            ResourceKind::Service => get_in(self.services(id)?, id).await,
            ResourceKind::Route => get_in(self.routes(id)?, id).await,
        }
    }

    async fn logs(&self, id: &ResourceId) -> Result<String> {
        if !id.kind.supports_logs() {
            return Err(HarnessError::InvalidResource(format!(
                "{} does not produce logs",
                id
            )));
        }

        let api = self.pods(id)?;
        let params = LogParams::default();
        retry_read(id, || api.logs(&id.name, &params)).await
    }

    async fn proxy_get(&self, id: &ResourceId, path: &str) -> Result<String> {
        let uri = proxy_path(id, path)?;
        debug!(resource = %id, uri = %uri, "Proxying GET through the API server");

        let uri: http::Uri = uri
            .parse()
            .map_err(|e| HarnessError::InvalidResource(format!("Invalid proxy path {}: {}", uri, e)))?;

        retry_read(id, || {
            let client = self.client.clone();
            let mut request = http::Request::new(Vec::new());
            *request.uri_mut() = uri.clone();
            async move { client.request_text(request).await }
        })
        .await
    }
}

/// API server proxy path for a Pod or Service.
pub fn proxy_path(id: &ResourceId, path: &str) -> Result<String> {
    let plural = match id.kind {
        ResourceKind::Pod => "pods",
        ResourceKind::Service => "services",
        _ => {
            return Err(HarnessError::InvalidResource(format!(
                "{} cannot be proxied",
                id
            )))
        }
    };

    Ok(format!(
        "/api/v1/namespaces/{}/{}/{}/proxy/{}",
        id.require_namespace()?,
        plural,
        id.name,
        path.trim_start_matches('/')
    ))
}

async fn create_in<K>(api: Api<K>, object: &K, id: &ResourceId) -> Result<Value>
where
    K: Clone + DeserializeOwned + Serialize + Debug,
{
    let created = api
        .create(&PostParams::default(), object)
        .await
        .map_err(|e| map_kube_error(e, id))?;
    Ok(serde_json::to_value(created)?)
}

async fn delete_in<K>(api: Api<K>, id: &ResourceId) -> Result<()>
where
    K: Clone + DeserializeOwned + Debug,
{
    api.delete(&id.name, &DeleteParams::default())
        .await
        .map_err(|e| map_kube_error(e, id))?;
    Ok(())
}

async fn get_in<K>(api: Api<K>, id: &ResourceId) -> Result<Value>
where
    K: Clone + DeserializeOwned + Serialize + Debug,
{
    let object = retry_read(id, || api.get(&id.name)).await?;
    Ok(serde_json::to_value(object)?)
}

fn read_backoff() -> ExponentialBuilder {
    ExponentialBuilder::default()
        .with_min_delay(Duration::from_millis(READ_RETRY_MIN_DELAY_MS))
        .with_max_times(READ_RETRY_MAX_TIMES)
}

/// Run an idempotent read, retrying transient failures with exponential backoff.
async fn retry_read<T, F, Fut>(id: &ResourceId, op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, kube::Error>>,
{
    op.retry(read_backoff())
        .when(is_transient)
        .notify(|err: &kube::Error, delay: Duration| {
            warn!(
                resource = %id,
                error = %err,
                delay_ms = delay.as_millis() as u64,
                "Transient read failure, retrying"
            );
        })
        .await
        .map_err(|e| map_kube_error(e, id))
}

pub(crate) fn is_transient(err: &kube::Error) -> bool {
    match err {
        kube::Error::Api(ae) => matches!(ae.code, 429 | 500 | 502 | 503 | 504),
        kube::Error::HyperError(_) | kube::Error::Service(_) => true,
        _ => false,
    }
}

pub(crate) fn map_kube_error(err: kube::Error, id: &ResourceId) -> HarnessError {
    match err {
        kube::Error::Api(ae) if ae.code == 404 => id.not_found(),
        kube::Error::Api(ae) if ae.code == 409 => id.already_exists(),
        kube::Error::Api(ae) => HarnessError::Remote(format!("{}: {} ({})", id, ae.message, ae.code)),
        other => HarnessError::Remote(format!("{}: {}", id, other)),
    }
}
