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

use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HarnessError>;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Template error: {0}")]
    Template(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Resource not found: {resource_type} '{name}' in namespace '{namespace}'")]
    NotFound {
        resource_type: String,
        name: String,
        namespace: String,
    },

    #[error("Resource already exists: {resource_type} '{name}' in namespace '{namespace}'")]
    AlreadyExists {
        resource_type: String,
        name: String,
        namespace: String,
    },

    #[error(
        "Timed out after {timeout:?} waiting for {resource_type} '{name}' in namespace '{namespace}' to become {expected} (last observed: {})",
        .last_state.as_deref().unwrap_or("none")
    )]
    TimeoutExpired {
        resource_type: String,
        name: String,
        namespace: String,
        expected: String,
        last_state: Option<String>,
        timeout: Duration,
    },

    #[error("{resource_type} '{name}' in namespace '{namespace}' reached {observed} while waiting for {expected}")]
    UnexpectedState {
        resource_type: String,
        name: String,
        namespace: String,
        expected: String,
        observed: String,
    },

    #[error("Remote API error: {0}")]
    Remote(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid resource: {0}")]
    InvalidResource(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl From<kube::Error> for HarnessError {
    fn from(err: kube::Error) -> Self {
        HarnessError::Remote(err.to_string())
    }
}

impl From<reqwest::Error> for HarnessError {
    fn from(err: reqwest::Error) -> Self {
        HarnessError::Http(err.to_string())
    }
}

impl HarnessError {
    pub fn config_error(context: impl Into<String>) -> Self {
        Self::Config(context.into())
    }

    pub fn not_found(
        resource_type: impl Into<String>,
        name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    pub fn already_exists(
        resource_type: impl Into<String>,
        name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self::AlreadyExists {
            resource_type: resource_type.into(),
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message_includes_last_state() {
        let err = HarnessError::TimeoutExpired {
            resource_type: "Pod".to_string(),
            name: "nginx".to_string(),
            namespace: "webserver-alice".to_string(),
            expected: "Running".to_string(),
            last_state: Some("Pending".to_string()),
            timeout: Duration::from_secs(1),
        };
        let msg = err.to_string();
        assert!(msg.contains("Running"));
        assert!(msg.contains("last observed: Pending"));
    }

    #[test]
    fn test_timeout_message_without_state() {
        let err = HarnessError::TimeoutExpired {
            resource_type: "Namespace".to_string(),
            name: "webserver-alice".to_string(),
            namespace: String::new(),
            expected: "Active".to_string(),
            last_state: None,
            timeout: Duration::from_secs(240),
        };
        assert!(err.to_string().contains("last observed: none"));
    }

    #[test]
    fn test_is_not_found() {
        assert!(HarnessError::not_found("Pod", "nginx", "default").is_not_found());
        assert!(!HarnessError::Remote("boom".to_string()).is_not_found());
    }
}
