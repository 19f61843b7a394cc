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

/// Operator identity
pub const OPERATOR_ENV_VAR: &str = "USER";
pub const WEBSERVER_NAME_PREFIX: &str = "webserver";

/// Template location
pub const DEFAULT_TEMPLATE_DIR: &str = "templates/nginx_pod";
pub const DEFAULT_TEMPLATE_FILE: &str = "nginx_pod_template.j2";

/// Readiness timeouts (seconds)
pub const TIMEOUT_4MIN: u64 = 240;
pub const SERVICE_READY_TIMEOUT: u64 = 60;

/// Poll interval between status reads (milliseconds)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;

/// Read retry
pub const READ_RETRY_MAX_TIMES: usize = 3;
pub const READ_RETRY_MIN_DELAY_MS: u64 = 200;

/// Route
pub const DEFAULT_ROUTE_NAME: &str = "nginx-route";
pub const ROUTE_GROUP: &str = "route.openshift.io";
pub const ROUTE_VERSION: &str = "v1";
pub const ROUTE_CONDITION_ADMITTED: &str = "Admitted";

/// Webserver ports
pub const DEFAULT_HTTP_PORT: u16 = 80;
pub const DEFAULT_CONTAINER_PORT: u16 = 8080;

/// Service types accepted by the template
pub const SERVICE_TYPES: &[&str] = &["ClusterIP", "NodePort", "LoadBalancer"];

/// HTTP acceptance request
pub const HTTP_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default log filter for the binary
pub const DEFAULT_LOG_FILTER: &str = "info,kube=warn";
