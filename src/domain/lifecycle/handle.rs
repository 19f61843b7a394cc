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

use crate::domain::resource::{ResourceDescriptor, ResourceId, ResourceKind, ResourceState};
use crate::infrastructure::kubernetes::RemoteApi;
use crate::shared::error::{HarnessError, Result};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// A live remote resource owned by the scope that created it.
///
/// The observed state only changes through [`ResourceHandle::refresh_status`].
/// [`ResourceHandle::delete`] consumes the handle.
pub struct ResourceHandle {
    api: Arc<dyn RemoteApi>,
    descriptor: ResourceDescriptor,
    last_state: Option<ResourceState>,
}

impl std::fmt::Debug for ResourceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceHandle")
            .field("id", self.id())
            .field("last_state", &self.last_state)
            .finish()
    }
}

impl ResourceHandle {
    /// Submit `descriptor` and return a handle to the created resource.
    pub async fn create(api: Arc<dyn RemoteApi>, descriptor: ResourceDescriptor) -> Result<Self> {
        let created = api.create(&descriptor).await?;
        let observed = ResourceState::observe(descriptor.kind(), &created);
        info!(resource = %descriptor.id(), state = %observed, "Created resource");

        Ok(Self {
            api,
            descriptor,
            last_state: Some(observed),
        })
    }

    pub fn id(&self) -> &ResourceId {
        self.descriptor.id()
    }

    pub fn kind(&self) -> ResourceKind {
        self.descriptor.kind()
    }

    pub fn name(&self) -> &str {
        self.descriptor.name()
    }

    pub fn namespace_name(&self) -> Option<&str> {
        self.descriptor.namespace_name()
    }

    pub fn descriptor(&self) -> &ResourceDescriptor {
        &self.descriptor
    }

    pub fn api(&self) -> &Arc<dyn RemoteApi> {
        &self.api
    }

    /// Last state observed by a status read, if any.
    pub fn state(&self) -> Option<&ResourceState> {
        self.last_state.as_ref()
    }

    /// Fetch the current state from the cluster and remember it.
    pub async fn refresh_status(&mut self) -> Result<ResourceState> {
        let state = self.api.status(self.id()).await?;
        debug!(resource = %self.id(), state = %state, "Observed state");
        self.last_state = Some(state.clone());
        Ok(state)
    }

    /// Current remote object as JSON.
    pub async fn fetch(&self) -> Result<Value> {
        self.api.get(self.id()).await
    }

    pub async fn logs(&self) -> Result<String> {
        if !self.kind().supports_logs() {
            return Err(HarnessError::InvalidResource(format!(
                "{} does not produce logs",
                self.id()
            )));
        }
        self.api.logs(self.id()).await
    }

    pub async fn proxy_get(&self, path: &str) -> Result<String> {
        if !self.kind().supports_proxy() {
            return Err(HarnessError::InvalidResource(format!(
                "{} cannot be proxied",
                self.id()
            )));
        }
        self.api.proxy_get(self.id(), path).await
    }

    /// Delete the remote resource.
    pub async fn delete(self) -> Result<()> {
        self.api.delete(self.id()).await?;
        info!(resource = %self.id(), "Deleted resource");
        Ok(())
    }
}
