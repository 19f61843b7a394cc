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

//! Sequencing of dependent resources with reverse-order teardown.

use crate::domain::chain::report::{ChainReport, StepReport, StepState};
use crate::domain::lifecycle::{acquire, release, wait_for, PollSettings, ReadinessTarget, ResourceHandle};
use crate::domain::resource::ResourceDescriptor;
use crate::infrastructure::kubernetes::RemoteApi;
use crate::shared::error::{HarnessError, Result};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::panic::{resume_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

type BuildFn = Box<dyn FnOnce(&ChainHandles) -> Result<ResourceDescriptor> + Send>;

/// One resource in a chain: how to build it from the handles created before it,
/// and which state it must reach before the next step starts.
pub struct ChainStep {
    name: String,
    build: BuildFn,
    readiness: Option<ReadinessTarget>,
}

impl ChainStep {
    pub fn new<F>(name: impl Into<String>, build: F) -> Self
    where
        F: FnOnce(&ChainHandles) -> Result<ResourceDescriptor> + Send + 'static,
    {
        Self {
            name: name.into(),
            build: Box::new(build),
            readiness: None,
        }
    }

    pub fn ready_when(mut self, target: ReadinessTarget) -> Self {
        self.readiness = Some(target);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn readiness(&self) -> Option<&ReadinessTarget> {
        self.readiness.as_ref()
    }
}

struct ChainEntry {
    index: usize,
    name: String,
    handle: ResourceHandle,
}

/// Handles created so far, in creation order
#[derive(Default)]
pub struct ChainHandles {
    entries: Vec<ChainEntry>,
}

impl ChainHandles {
    pub fn get(&self, name: &str) -> Option<&ResourceHandle> {
        self.entries.iter().find(|e| e.name == name).map(|e| &e.handle)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut ResourceHandle> {
        self.entries
            .iter_mut()
            .find(|e| e.name == name)
            .map(|e| &mut e.handle)
    }

    /// Handle of an earlier step, failing when it does not exist.
    pub fn require(&self, name: &str) -> Result<&ResourceHandle> {
        self.get(name).ok_or_else(|| missing_step(name))
    }

    pub fn require_mut(&mut self, name: &str) -> Result<&mut ResourceHandle> {
        self.get_mut(name).ok_or_else(|| missing_step(name))
    }

    pub fn last(&self) -> Option<&ResourceHandle> {
        self.entries.last().map(|e| &e.handle)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn missing_step(name: &str) -> HarnessError {
    HarnessError::InvalidResource(format!("Chain has no ready step named '{}'", name))
}

/// Result of a chain run together with its per-step report
#[derive(Debug)]
pub struct ChainOutcome<T> {
    pub result: Result<T>,
    pub report: ChainReport,
}

impl<T> ChainOutcome<T> {
    pub fn into_result(self) -> Result<T> {
        self.result
    }
}

pub struct Chain {
    api: Arc<dyn RemoteApi>,
    steps: Vec<ChainStep>,
    poll: PollSettings,
}

impl Chain {
    pub fn new(api: Arc<dyn RemoteApi>) -> Self {
        Self {
            api,
            steps: Vec::new(),
            poll: PollSettings::default(),
        }
    }

    pub fn step(mut self, step: ChainStep) -> Self {
        self.steps.push(step);
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll = PollSettings::every(interval);
        self
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name.as_str()).collect()
    }

    /// Create every step in order, run `body` once all are ready, then delete
    /// everything that was created in reverse order.
    ///
    /// The first failure stops the chain and is returned unchanged; `body`
    /// only runs when every step became ready.
    pub async fn run<T, F>(self, body: F) -> ChainOutcome<T>
    where
        F: for<'a> FnOnce(&'a mut ChainHandles) -> BoxFuture<'a, Result<T>>,
    {
        let Chain { api, steps, poll } = self;

        let mut report = ChainReport {
            steps: steps.iter().map(|s| StepReport::new(s.name.clone())).collect(),
        };
        let mut handles = ChainHandles::default();

        let outcome = AssertUnwindSafe(async {
            for (index, step) in steps.into_iter().enumerate() {
                bring_up(&api, &poll, index, step, &mut handles, &mut report).await?;
            }

            for entry in &handles.entries {
                report.steps[entry.index].advance(StepState::InUse);
            }
            info!(steps = handles.len(), "Chain ready, running body");
            body(&mut handles).await
        })
        .catch_unwind()
        .await;

        teardown(handles, &mut report).await;

        match outcome {
            Ok(result) => {
                if let Err(e) = &result {
                    error!(error = %e, "Chain failed");
                }
                ChainOutcome { result, report }
            }
            Err(panic) => resume_unwind(panic),
        }
    }
}

async fn bring_up(
    api: &Arc<dyn RemoteApi>,
    poll: &PollSettings,
    index: usize,
    step: ChainStep,
    handles: &mut ChainHandles,
    report: &mut ChainReport,
) -> Result<()> {
    let ChainStep {
        name,
        build,
        readiness,
    } = step;
    let entry = &mut report.steps[index];

    let descriptor = match build(handles) {
        Ok(d) => d,
        Err(e) => {
            warn!(step = %name, error = %e, "Failed to build step descriptor");
            entry.fail(&e);
            return Err(e);
        }
    };
    entry.id = Some(descriptor.id().clone());
    info!(step = %name, resource = %descriptor.id(), "Creating step resource");

    let handle = match acquire(api.clone(), descriptor).await {
        Ok(h) => h,
        Err(e) => {
            entry.fail(&e);
            return Err(e);
        }
    };
    entry.advance(StepState::Created);

    // Registered before the readiness wait so teardown sees it on every exit path.
    handles.entries.push(ChainEntry {
        index,
        name,
        handle,
    });

    let ready = match (&readiness, handles.entries.last_mut()) {
        (Some(target), Some(created)) => wait_for(&mut created.handle, target, poll).await,
        _ => Ok(()),
    };

    match ready {
        Ok(()) => {
            entry.advance(StepState::Ready);
            Ok(())
        }
        Err(e) => {
            entry.fail(&e);
            Err(e)
        }
    }
}

async fn teardown(handles: ChainHandles, report: &mut ChainReport) {
    for entry in handles.entries.into_iter().rev() {
        info!(step = %entry.name, resource = %entry.handle.id(), "Tearing down step");
        let outcome = release(entry.handle).await;
        let step = &mut report.steps[entry.index];
        if outcome.is_released() {
            step.advance(StepState::Deleted);
        }
        step.teardown = Some(outcome);
    }
}
