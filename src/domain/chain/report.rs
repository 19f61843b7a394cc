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

use crate::domain::lifecycle::Teardown;
use crate::domain::resource::{ResourceId, ResourceKind};
use std::fmt;

/// Lifecycle of one chain step.
///
/// `Pending -> Created -> Ready -> InUse -> Deleted`, with `Failed` reachable
/// from `Pending` and `Created`. `Failed` and `Deleted` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    Pending,
    Created,
    Ready,
    InUse,
    Deleted,
    Failed,
}

impl StepState {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepState::Pending => "Pending",
            StepState::Created => "Created",
            StepState::Ready => "Ready",
            StepState::InUse => "InUse",
            StepState::Deleted => "Deleted",
            StepState::Failed => "Failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, StepState::Deleted | StepState::Failed)
    }
}

impl fmt::Display for StepState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    pub name: String,
    /// Identity of the resource, known once the step's descriptor was built
    pub id: Option<ResourceId>,
    pub state: StepState,
    pub error: Option<String>,
    /// Outcome of deleting the resource; `None` when nothing was created
    pub teardown: Option<Teardown>,
}

impl StepReport {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            state: StepState::Pending,
            error: None,
            teardown: None,
        }
    }

    pub fn kind(&self) -> Option<ResourceKind> {
        self.id.as_ref().map(|id| id.kind)
    }

    pub(crate) fn advance(&mut self, next: StepState) {
        if !self.state.is_terminal() {
            self.state = next;
        }
    }

    pub(crate) fn fail(&mut self, error: impl fmt::Display) {
        self.state = StepState::Failed;
        self.error = Some(error.to_string());
    }
}

/// Per-step account of a chain run, including teardown outcomes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChainReport {
    pub steps: Vec<StepReport>,
}

impl ChainReport {
    pub fn step(&self, name: &str) -> Option<&StepReport> {
        self.steps.iter().find(|s| s.name == name)
    }

    /// First step that failed, if any
    pub fn failed_step(&self) -> Option<&StepReport> {
        self.steps.iter().find(|s| s.state == StepState::Failed)
    }

    pub fn teardown_failures(&self) -> impl Iterator<Item = &StepReport> {
        self.steps
            .iter()
            .filter(|s| matches!(s.teardown, Some(Teardown::Failed(_))))
    }

    pub fn is_clean(&self) -> bool {
        self.failed_step().is_none() && self.teardown_failures().next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states_do_not_advance() {
        let mut step = StepReport::new("pod");
        step.advance(StepState::Created);
        step.fail("boom");
        step.advance(StepState::Deleted);
        assert_eq!(step.state, StepState::Failed);
        assert_eq!(step.error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_teardown_failures_are_listed() {
        let mut ok = StepReport::new("namespace");
        ok.teardown = Some(Teardown::Deleted);
        let mut bad = StepReport::new("pod");
        bad.teardown = Some(Teardown::Failed("forbidden".to_string()));
        let report = ChainReport {
            steps: vec![ok, bad],
        };
        let names: Vec<_> = report.teardown_failures().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["pod"]);
        assert!(!report.is_clean());
    }
}
