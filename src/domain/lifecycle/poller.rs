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

//! Readiness polling against a resource handle.

use crate::domain::lifecycle::handle::ResourceHandle;
use crate::domain::resource::ResourceState;
use crate::infrastructure::constants::DEFAULT_POLL_INTERVAL_MS;
use crate::shared::error::{HarnessError, Result};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// State a handle must reach, and how long to wait for it
#[derive(Debug, Clone, PartialEq)]
pub struct ReadinessTarget {
    pub state: ResourceState,
    pub timeout: Duration,
    /// States that end the wait immediately with `UnexpectedState`
    pub abort_on: Vec<ResourceState>,
}

impl ReadinessTarget {
    pub fn new(state: impl Into<ResourceState>, timeout: Duration) -> Self {
        Self {
            state: state.into(),
            timeout,
            abort_on: Vec::new(),
        }
    }

    pub fn abort_on(mut self, state: impl Into<ResourceState>) -> Self {
        self.abort_on.push(state.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

impl PollSettings {
    pub fn every(interval: Duration) -> Self {
        Self { interval }
    }
}

/// Block until `handle` reports `target.state`.
///
/// The deadline is measured from the start of the call. Transport errors from
/// the status read are returned as-is.
pub async fn wait_for(
    handle: &mut ResourceHandle,
    target: &ReadinessTarget,
    poll: &PollSettings,
) -> Result<()> {
    let start = Instant::now();
    let deadline = start + target.timeout;
    let interval = poll.interval.max(Duration::from_millis(1));

    debug!(
        resource = %handle.id(),
        expected = %target.state,
        timeout_secs = target.timeout.as_secs(),
        "Waiting for readiness"
    );

    loop {
        // A single read may not outlive the deadline by more than one interval.
        let budget = deadline.saturating_duration_since(Instant::now()) + interval;
        let read = tokio::time::timeout(budget, handle.refresh_status()).await;
        let observed = match read {
            Ok(state) => state?,
            Err(_) => {
                warn!(resource = %handle.id(), expected = %target.state, "Status read outlived the readiness deadline");
                return Err(timed_out(handle, target));
            }
        };

        if observed == target.state {
            info!(
                resource = %handle.id(),
                state = %observed,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Resource ready"
            );
            return Ok(());
        }

        if target.abort_on.contains(&observed) {
            warn!(resource = %handle.id(), state = %observed, expected = %target.state, "Resource reached a terminal state");
            let id = handle.id();
            return Err(HarnessError::UnexpectedState {
                resource_type: id.kind.to_string(),
                name: id.name.clone(),
                namespace: id.namespace_or_empty().to_string(),
                expected: target.state.to_string(),
                observed: observed.to_string(),
            });
        }

        let now = Instant::now();
        if now >= deadline {
            warn!(resource = %handle.id(), last_state = %observed, expected = %target.state, "Readiness wait timed out");
            return Err(timed_out(handle, target));
        }

        tokio::time::sleep(interval.min(deadline - now)).await;
    }
}

/// `TimeoutExpired` carrying the last state the handle observed
fn timed_out(handle: &ResourceHandle, target: &ReadinessTarget) -> HarnessError {
    let id = handle.id();
    HarnessError::TimeoutExpired {
        resource_type: id.kind.to_string(),
        name: id.name.clone(),
        namespace: id.namespace_or_empty().to_string(),
        expected: target.state.to_string(),
        last_state: handle.state().map(ToString::to_string),
        timeout: target.timeout,
    }
}
