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

//! `-D key=value` overrides applied on top of the config file.

use crate::domain::config::harness::{HarnessConfig, ServiceType};
use crate::shared::error::{HarnessError, Result};
use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::warn;

/// Parse `key=value` pairs as given on the command line.
pub fn parse_dynamic_configs(configs: &[String]) -> Result<HashMap<String, String>> {
    let mut map = HashMap::new();

    for config in configs {
        let Some((key, value)) = config.split_once('=') else {
            return Err(HarnessError::config_error(format!(
                "Invalid config format: '{}'. Expected 'key=value'",
                config
            )));
        };

        let key = key.trim();
        if key.is_empty() {
            return Err(HarnessError::config_error(format!(
                "Empty key in config: '{}'",
                config
            )));
        }

        map.insert(key.to_string(), value.trim().to_string());
    }

    Ok(map)
}

pub fn apply_to_harness_config(
    configs: &HashMap<String, String>,
    config: &mut HarnessConfig,
) -> Result<()> {
    for (key, value) in configs {
        match key.as_str() {
            "cluster.kubeconfig" => config.cluster.kubeconfig = Some(value.clone()),
            "cluster.context" => config.cluster.context = Some(value.clone()),
            "template.dir" => config.template.dir = PathBuf::from(value),
            "template.file" => config.template.file = value.clone(),
            "template.image" => config.template.image = Some(value.clone()),
            "template.node-name" => config.template.node_name = Some(value.clone()),
            "template.container-port" => config.template.container_port = parse(key, value)?,
            "service.type" => config.service.service_type = ServiceType::from_str(value)?,
            "service.port" => config.service.port = parse(key, value)?,
            "route.name" => config.route.name = value.clone(),
            "route.port" => config.route.port = parse(key, value)?,
            "timeouts.namespace" => config.timeouts.namespace_secs = parse(key, value)?,
            "timeouts.pod" => config.timeouts.pod_secs = parse(key, value)?,
            "timeouts.service" => config.timeouts.service_secs = parse(key, value)?,
            "timeouts.route" => config.timeouts.route_secs = parse(key, value)?,
            "timeouts.poll-interval-ms" => config.timeouts.poll_interval_ms = parse(key, value)?,
            _ => warn!(key = %key, "Ignoring unknown dynamic property"),
        }
    }

    Ok(())
}

fn parse<T: FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value.parse::<T>().map_err(|e| {
        HarnessError::config_error(format!("Invalid value '{}' for {}: {}", value, key, e))
    })
}
