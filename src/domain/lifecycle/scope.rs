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

//! Scoped acquisition: a created resource is always released when the scope
//! exits, whether the body returned, failed or panicked.

use crate::domain::lifecycle::handle::ResourceHandle;
use crate::domain::lifecycle::poller::{wait_for, PollSettings, ReadinessTarget};
use crate::domain::resource::ResourceDescriptor;
use crate::infrastructure::kubernetes::RemoteApi;
use crate::shared::error::{HarnessError, Result};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::any::Any;
use std::fmt;
use std::panic::{resume_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, warn};

/// Result of releasing a handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Teardown {
    Deleted,
    /// The resource was already gone when the delete was issued
    AlreadyGone,
    Failed(String),
}

impl Teardown {
    pub fn is_released(&self) -> bool {
        !matches!(self, Teardown::Failed(_))
    }
}

impl fmt::Display for Teardown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Teardown::Deleted => f.write_str("deleted"),
            Teardown::AlreadyGone => f.write_str("already gone"),
            Teardown::Failed(e) => write!(f, "failed: {}", e),
        }
    }
}

/// Create a resource. When creation fails with a transport error the request
/// may still have been applied, so a best-effort delete is issued for the
/// descriptor's identity before the original error is returned.
pub async fn acquire(
    api: Arc<dyn RemoteApi>,
    descriptor: ResourceDescriptor,
) -> Result<ResourceHandle> {
    let id = descriptor.id().clone();

    match ResourceHandle::create(api.clone(), descriptor).await {
        Ok(handle) => Ok(handle),
        Err(err @ HarnessError::Remote(_)) => {
            warn!(resource = %id, error = %err, "Create failed, removing any partially applied resource");
            match api.delete(&id).await {
                Ok(()) => debug!(resource = %id, "Removed partially applied resource"),
                Err(e) if e.is_not_found() => {}
                Err(e) => warn!(resource = %id, error = %e, "Best-effort delete failed"),
            }
            Err(err)
        }
        Err(err) => Err(err),
    }
}

/// Delete a handle. Never fails; the outcome is logged and returned.
pub async fn release(handle: ResourceHandle) -> Teardown {
    let id = handle.id().clone();

    match handle.delete().await {
        Ok(()) => Teardown::Deleted,
        Err(e) if e.is_not_found() => {
            debug!(resource = %id, "Resource already released");
            Teardown::AlreadyGone
        }
        Err(e) => {
            warn!(resource = %id, error = %e, "Failed to release resource");
            Teardown::Failed(e.to_string())
        }
    }
}

/// Create `descriptor`, run `body` against it and delete it afterwards.
///
/// A release failure is logged and never replaces the body's result. A panic
/// in the body is resumed after the release.
pub async fn with_resource<T, F>(
    api: Arc<dyn RemoteApi>,
    descriptor: ResourceDescriptor,
    body: F,
) -> Result<T>
where
    F: for<'a> FnOnce(&'a mut ResourceHandle) -> BoxFuture<'a, Result<T>>,
{
    let mut handle = acquire(api, descriptor).await?;

    let outcome = AssertUnwindSafe(async { body(&mut handle).await })
        .catch_unwind()
        .await;

    conclude(handle, outcome).await
}

/// Like [`with_resource`], but waits for `target` before running `body`.
pub async fn with_ready_resource<T, F>(
    api: Arc<dyn RemoteApi>,
    descriptor: ResourceDescriptor,
    target: &ReadinessTarget,
    poll: &PollSettings,
    body: F,
) -> Result<T>
where
    F: for<'a> FnOnce(&'a mut ResourceHandle) -> BoxFuture<'a, Result<T>>,
{
    let mut handle = acquire(api, descriptor).await?;

    let outcome = AssertUnwindSafe(async {
        wait_for(&mut handle, target, poll).await?;
        body(&mut handle).await
    })
    .catch_unwind()
    .await;

    conclude(handle, outcome).await
}

async fn conclude<T>(
    handle: ResourceHandle,
    outcome: std::result::Result<Result<T>, Box<dyn Any + Send>>,
) -> Result<T> {
    release(handle).await;

    match outcome {
        Ok(result) => result,
        Err(panic) => resume_unwind(panic),
    }
}
