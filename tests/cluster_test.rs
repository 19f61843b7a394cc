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

use std::sync::Arc;
use webserver_harness::domain::webserver::run_webserver;
use webserver_harness::{HarnessConfig, KubeRemoteApi};

#[tokio::test]
#[ignore] // Requires Kubernetes cluster with the route.openshift.io API
async fn test_webserver_chain_on_cluster() {
    let config = HarnessConfig::load(None)
        .and_then(|c| c.with_operator_from_env())
        .expect("config");
    config.validate().expect("valid config");

    let api = KubeRemoteApi::new().await.expect("cluster client");
    let outcome = run_webserver(Arc::new(api), &config).await;

    assert!(outcome.report.is_clean(), "{:?}", outcome.report);
    let checks = outcome.into_result().expect("chain");
    assert!(checks.all_passed(), "{:?}", checks);
}
