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

// Core modules
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod shared;

// Re-export commonly used types
pub use domain::chain::{Chain, ChainHandles, ChainOutcome, ChainReport, ChainStep, StepState};
pub use domain::config::{HarnessConfig, ServiceType};
pub use domain::lifecycle::{
    wait_for, with_ready_resource, with_resource, PollSettings, ReadinessTarget, ResourceHandle,
    Teardown,
};
pub use domain::resource::{ResourceDescriptor, ResourceId, ResourceKind, ResourceState};
pub use infrastructure::kubernetes::{KubeRemoteApi, RemoteApi};
pub use infrastructure::template::{render, render_descriptor, RenderContext};
pub use shared::{HarnessError, Result};
