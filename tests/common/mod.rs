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

//! Scripted in-memory cluster used by the integration tests.

#![allow(dead_code)]

use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use webserver_harness::{
    HarnessError, RemoteApi, ResourceDescriptor, ResourceId, ResourceKind, ResourceState, Result,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Create(ResourceId),
    Delete(ResourceId),
    Get(ResourceId),
    Status(ResourceId),
    Logs(ResourceId),
    Proxy(ResourceId, String),
}

/// Failure to inject for a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    Remote,
    AlreadyExists,
    NotFound,
}

impl Fault {
    fn into_error(self, id: &ResourceId) -> HarnessError {
        match self {
            Fault::Remote => HarnessError::Remote(format!("{}: connection reset", id)),
            Fault::AlreadyExists => id.already_exists(),
            Fault::NotFound => id.not_found(),
        }
    }
}

#[derive(Debug, Clone)]
enum Step {
    State(ResourceState),
    Fail(Fault),
}

#[derive(Default)]
struct Inner {
    objects: HashMap<ResourceId, Value>,
    calls: Vec<Call>,
    statuses: HashMap<ResourceId, VecDeque<Step>>,
    create_faults: HashMap<ResourceId, Fault>,
    delete_faults: HashMap<ResourceId, Fault>,
    route_host: Option<String>,
    status_delay: Option<Duration>,
    status_panics: Vec<ResourceId>,
    logs: String,
    proxy_body: String,
}

/// Fake cluster. Resources report their ready state unless a status script is
/// set; the last scripted entry repeats.
#[derive(Clone)]
pub struct FakeRemoteApi {
    inner: Arc<Mutex<Inner>>,
}

impl Default for FakeRemoteApi {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeRemoteApi {
    pub fn new() -> Self {
        let inner = Inner {
            logs: "start worker processes\n".to_string(),
            proxy_body: "<h1>Welcome to nginx!</h1>".to_string(),
            ..Default::default()
        };
        Self {
            inner: Arc::new(Mutex::new(inner)),
        }
    }

    pub fn shared(&self) -> Arc<dyn RemoteApi> {
        Arc::new(self.clone())
    }

    pub fn script_status(&self, id: &ResourceId, states: &[&str]) {
        let steps = states
            .iter()
            .map(|s| Step::State(ResourceState::from(*s)))
            .collect();
        self.inner.lock().unwrap().statuses.insert(id.clone(), steps);
    }

    /// Status reads for `id` fail with `fault` after the given states.
    pub fn script_status_then_fail(&self, id: &ResourceId, states: &[&str], fault: Fault) {
        let mut steps: VecDeque<Step> = states
            .iter()
            .map(|s| Step::State(ResourceState::from(*s)))
            .collect();
        steps.push_back(Step::Fail(fault));
        self.inner.lock().unwrap().statuses.insert(id.clone(), steps);
    }

    pub fn fail_create(&self, id: &ResourceId, fault: Fault) {
        self.inner
            .lock()
            .unwrap()
            .create_faults
            .insert(id.clone(), fault);
    }

    pub fn fail_delete(&self, id: &ResourceId, fault: Fault) {
        self.inner
            .lock()
            .unwrap()
            .delete_faults
            .insert(id.clone(), fault);
    }

    /// Every status read sleeps for `delay` before answering.
    pub fn delay_status(&self, delay: Duration) {
        self.inner.lock().unwrap().status_delay = Some(delay);
    }

    pub fn panic_on_status(&self, id: &ResourceId) {
        self.inner.lock().unwrap().status_panics.push(id.clone());
    }

    pub fn set_route_host(&self, host: &str) {
        self.inner.lock().unwrap().route_host = Some(host.to_string());
    }

    pub fn set_proxy_body(&self, body: &str) {
        self.inner.lock().unwrap().proxy_body = body.to_string();
    }

    pub fn insert_object(&self, id: &ResourceId, object: Value) {
        self.inner.lock().unwrap().objects.insert(id.clone(), object);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn created(&self) -> Vec<ResourceId> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Create(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn deleted(&self) -> Vec<ResourceId> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Delete(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn status_reads(&self, id: &ResourceId) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Status(i) if i == id))
            .count()
    }

    pub fn exists(&self, id: &ResourceId) -> bool {
        self.inner.lock().unwrap().objects.contains_key(id)
    }
}

fn ready_state(kind: ResourceKind) -> ResourceState {
    match kind {
        ResourceKind::Namespace => ResourceState::active(),
        ResourceKind::Pod => ResourceState::running(),
        ResourceKind::Service => ResourceState::ready(),
        ResourceKind::Route => ResourceState::admitted(),
    }
}

#[async_trait::async_trait]
impl RemoteApi for FakeRemoteApi {
    async fn create(&self, descriptor: &ResourceDescriptor) -> Result<Value> {
        let id = descriptor.id().clone();
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::Create(id.clone()));

        if let Some(fault) = inner.create_faults.get(&id) {
            return Err(fault.into_error(&id));
        }
        if inner.objects.contains_key(&id) {
            return Err(id.already_exists());
        }

        let mut object = descriptor.to_manifest_value()?;
        if id.kind == ResourceKind::Route {
            if let Some(host) = &inner.route_host {
                object["spec"]["host"] = json!(host);
            }
        }
        inner.objects.insert(id, object.clone());
        Ok(object)
    }

    async fn delete(&self, id: &ResourceId) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::Delete(id.clone()));

        if let Some(fault) = inner.delete_faults.get(id) {
            return Err(fault.into_error(id));
        }
        match inner.objects.remove(id) {
            Some(_) => Ok(()),
            None => Err(id.not_found()),
        }
    }

    async fn get(&self, id: &ResourceId) -> Result<Value> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::Get(id.clone()));
        inner.objects.get(id).cloned().ok_or_else(|| id.not_found())
    }

    async fn status(&self, id: &ResourceId) -> Result<ResourceState> {
        let delay = {
            let mut inner = self.inner.lock().unwrap();
            inner.calls.push(Call::Status(id.clone()));
            if inner.status_panics.contains(id) {
                drop(inner);
                panic!("status read for {} panicked", id);
            }
            inner.status_delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut inner = self.inner.lock().unwrap();

        if !inner.objects.contains_key(id) {
            return Err(id.not_found());
        }

        let step = match inner.statuses.get_mut(id) {
            Some(script) if script.len() > 1 => script.pop_front(),
            Some(script) => script.front().cloned(),
            None => None,
        };

        match step {
            Some(Step::State(state)) => Ok(state),
            Some(Step::Fail(fault)) => Err(fault.into_error(id)),
            None => Ok(ready_state(id.kind)),
        }
    }

    async fn logs(&self, id: &ResourceId) -> Result<String> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::Logs(id.clone()));
        if !inner.objects.contains_key(id) {
            return Err(id.not_found());
        }
        Ok(inner.logs.clone())
    }

    async fn proxy_get(&self, id: &ResourceId, path: &str) -> Result<String> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::Proxy(id.clone(), path.to_string()));
        if !inner.objects.contains_key(id) {
            return Err(id.not_found());
        }
        Ok(inner.proxy_body.clone())
    }
}

pub fn namespace_id(name: &str) -> ResourceId {
    ResourceId::namespace(name)
}

pub fn pod_id(namespace: &str, name: &str) -> ResourceId {
    ResourceId::namespaced(ResourceKind::Pod, namespace, name)
}

/// Minimal pod descriptor in `namespace`
pub fn pod_descriptor(namespace: &str, name: &str) -> ResourceDescriptor {
    ResourceDescriptor::from_manifest(&format!(
        "apiVersion: v1\nkind: Pod\nmetadata:\n  name: {}\n  namespace: {}\nspec:\n  containers:\n    - name: nginx\n      image: nginx\n",
        name, namespace
    ))
    .unwrap()
}
