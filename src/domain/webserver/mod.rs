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

//! Webserver acceptance run: the resource chain and the checks against it

pub mod chain;
pub mod checks;

pub use self::chain::{pod_context, run_webserver, service_context, webserver_chain};
pub use self::checks::{run_checks, CheckReport, CheckResult, CheckStatus};
