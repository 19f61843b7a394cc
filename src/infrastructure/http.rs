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

//! Plain HTTP GET used as the end-to-end acceptance probe.

use crate::infrastructure::constants::HTTP_REQUEST_TIMEOUT_SECS;
use crate::shared::error::{HarnessError, Result};
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// URL the route exposes the webserver on
pub fn route_url(host: &str, port: u16) -> String {
    format!("http://{}:{}", host, port)
}

/// Issue a GET and return status and body. Non-2xx statuses are not errors here.
pub async fn get(url: &str) -> Result<HttpResponse> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(HTTP_REQUEST_TIMEOUT_SECS))
        .build()
        .map_err(|e| HarnessError::Http(format!("Failed to build HTTP client: {}", e)))?;

    debug!(url = %url, "Sending GET");
    let response = client.get(url).send().await?;
    let status = response.status().as_u16();
    let body = response.text().await?;
    info!(url = %url, status, bytes = body.len(), "GET completed");

    Ok(HttpResponse { status, body })
}
