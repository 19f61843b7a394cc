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

use crate::domain::chain::StepState;
use crate::domain::webserver::CheckStatus;

/// Status icons for terminal output
pub struct StatusIcon;

impl StatusIcon {
    pub const SUCCESS: &'static str = "✓";

    pub const WARNING: &'static str = "⚠";

    pub const ERROR: &'static str = "✗";

    /// Waiting on the cluster
    pub const PENDING: &'static str = "⏳";

    pub const SKIPPED: &'static str = "−";

    pub fn for_step(state: StepState) -> &'static str {
        match state {
            StepState::Ready | StepState::InUse | StepState::Deleted => Self::SUCCESS,
            StepState::Pending | StepState::Created => Self::PENDING,
            StepState::Failed => Self::ERROR,
        }
    }

    pub fn for_check(status: CheckStatus) -> &'static str {
        match status {
            CheckStatus::Passed => Self::SUCCESS,
            CheckStatus::Skipped => Self::SKIPPED,
            CheckStatus::Failed => Self::ERROR,
        }
    }
}
