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
use crate::domain::lifecycle::Teardown;
use crate::domain::webserver::CheckStatus;
use comfy_table::Color as TableColor;

/// Color scheme for report tables
#[derive(Debug, Clone, Copy)]
pub struct ColorTheme {
    pub success: TableColor,
    pub warning: TableColor,
    pub error: TableColor,
    pub info: TableColor,
    pub muted: TableColor,
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self {
            success: TableColor::Green,
            warning: TableColor::Yellow,
            error: TableColor::Red,
            info: TableColor::Cyan,
            muted: TableColor::DarkGrey,
        }
    }
}

impl ColorTheme {
    pub fn step_color(&self, state: StepState) -> TableColor {
        match state {
            StepState::Deleted | StepState::Ready | StepState::InUse => self.success,
            StepState::Created => self.info,
            StepState::Pending => self.muted,
            StepState::Failed => self.error,
        }
    }

    pub fn check_color(&self, status: CheckStatus) -> TableColor {
        match status {
            CheckStatus::Passed => self.success,
            CheckStatus::Skipped => self.warning,
            CheckStatus::Failed => self.error,
        }
    }

    pub fn teardown_color(&self, teardown: Option<&Teardown>) -> TableColor {
        match teardown {
            Some(Teardown::Deleted) => self.success,
            Some(Teardown::AlreadyGone) => self.warning,
            Some(Teardown::Failed(_)) => self.error,
            None => self.muted,
        }
    }
}
