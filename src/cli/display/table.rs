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

use super::{ColorTheme, StatusIcon};
use crate::domain::chain::ChainReport;
use crate::domain::webserver::{CheckReport, CheckStatus};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Table};

/// Table renderer for formatted output
pub struct TableRenderer {
    theme: ColorTheme,
}

impl Default for TableRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TableRenderer {
    pub fn new() -> Self {
        Self {
            theme: ColorTheme::default(),
        }
    }

    /// One row per chain step with its final state and teardown outcome
    pub fn render_chain_report(&self, report: &ChainReport) -> String {
        if report.steps.is_empty() {
            return "No chain steps".to_string();
        }

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("STEP").set_alignment(CellAlignment::Left),
                Cell::new("RESOURCE").set_alignment(CellAlignment::Left),
                Cell::new("STATE").set_alignment(CellAlignment::Center),
                Cell::new("TEARDOWN").set_alignment(CellAlignment::Center),
                Cell::new("ERROR").set_alignment(CellAlignment::Left),
            ]);

        for step in &report.steps {
            let resource = step
                .id
                .as_ref()
                .map(|id| id.to_string())
                .unwrap_or_else(|| "-".to_string());
            let teardown = step
                .teardown
                .as_ref()
                .map(|t| t.to_string())
                .unwrap_or_else(|| "-".to_string());

            table.add_row(vec![
                Cell::new(&step.name),
                Cell::new(resource),
                Cell::new(format!("{} {}", StatusIcon::for_step(step.state), step.state))
                    .fg(self.theme.step_color(step.state)),
                Cell::new(teardown).fg(self.theme.teardown_color(step.teardown.as_ref())),
                Cell::new(step.error.as_deref().unwrap_or("")),
            ]);
        }

        let mut output = String::new();
        output.push_str(&format!(
            "╭─ Resource Chain {} ─╮\n",
            format!("[{} steps]", report.steps.len()).bright_black()
        ));
        output.push_str(&table.to_string());
        output.push('\n');
        output
    }

    /// One row per check, in the order they ran
    pub fn render_check_report(&self, report: &CheckReport) -> String {
        if report.results.is_empty() {
            return "No checks ran".to_string();
        }

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("CHECK").set_alignment(CellAlignment::Left),
                Cell::new("RESULT").set_alignment(CellAlignment::Center),
                Cell::new("DETAIL").set_alignment(CellAlignment::Left),
            ]);

        for result in &report.results {
            table.add_row(vec![
                Cell::new(result.name),
                Cell::new(format!("{} {}", StatusIcon::for_check(result.status), result.status))
                    .fg(self.theme.check_color(result.status)),
                Cell::new(&result.detail),
            ]);
        }

        let passed = report
            .results
            .iter()
            .filter(|r| r.status == CheckStatus::Passed)
            .count();
        let mut output = String::new();
        output.push_str(&format!(
            "╭─ Webserver Checks {} ─╮\n",
            format!("[{}/{} passed]", passed, report.results.len()).bright_black()
        ));
        output.push_str(&table.to_string());
        output.push('\n');
        output.push_str(&format!(
            "Legend: {} Passed  {} Skipped  {} Failed\n",
            StatusIcon::SUCCESS.green(),
            StatusIcon::SKIPPED.yellow(),
            StatusIcon::ERROR.red()
        ));
        output
    }
}
