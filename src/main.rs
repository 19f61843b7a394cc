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

use clap::Parser;
use tracing_subscriber::EnvFilter;
use webserver_harness::cli::{commands::Commands, CliArgs};
use webserver_harness::infrastructure::constants::DEFAULT_LOG_FILTER;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = CliArgs::parse();

    match args.command {
        Commands::Run(cmd) => cmd.execute().await,
        Commands::Render(cmd) => cmd.execute(),
        Commands::Cleanup(cmd) => cmd.execute().await,
    }
}
