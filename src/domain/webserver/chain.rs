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

//! The namespace -> pod -> service -> route chain.

use crate::domain::chain::{Chain, ChainOutcome, ChainStep};
use crate::domain::config::{HarnessConfig, ServiceSection, TemplateSection};
use crate::domain::lifecycle::ReadinessTarget;
use crate::domain::resource::{ResourceDescriptor, ResourceState, Route};
use crate::domain::webserver::checks::{run_checks, CheckReport};
use crate::infrastructure::kubernetes::RemoteApi;
use crate::infrastructure::template::{render_descriptor, RenderContext};
use crate::shared::error::Result;
use std::sync::Arc;

pub const NAMESPACE_STEP: &str = "namespace";
pub const POD_STEP: &str = "pod";
pub const SERVICE_STEP: &str = "service";
pub const ROUTE_STEP: &str = "route";

/// Template context for the webserver pod
pub fn pod_context(template: &TemplateSection, namespace: &str) -> RenderContext {
    let mut ctx = RenderContext::new()
        .with("kind", "Pod")
        .with("namespace", namespace)
        .with("containerPort", template.container_port);
    if let Some(image) = &template.image {
        ctx.insert("image", image.as_str());
    }
    if let Some(node) = &template.node_name {
        ctx.insert("nodeName", node.as_str());
    }
    ctx
}

/// Template context for the service in front of the pod
pub fn service_context(service: &ServiceSection, namespace: &str) -> RenderContext {
    RenderContext::new()
        .with("kind", "Service")
        .with("namespace", namespace)
        .with("type", service.service_type.as_str())
        .with("port", service.port)
}

/// Build the four-step chain for `config`. Each step reads its namespace from
/// the handle created before it.
pub fn webserver_chain(api: Arc<dyn RemoteApi>, config: &HarnessConfig) -> Chain {
    let namespace = config.namespace_name();
    let timeouts = &config.timeouts;

    let pod_template = config.template.clone();
    let service_template = config.template.clone();
    let service = config.service.clone();
    let route_name = config.route.name.clone();

    Chain::new(api)
        .poll_interval(timeouts.poll_interval())
        .step(
            ChainStep::new(NAMESPACE_STEP, move |_| {
                ResourceDescriptor::namespace(&namespace)
            })
            .ready_when(ReadinessTarget::new(ResourceState::ACTIVE, timeouts.namespace())),
        )
        .step(
            ChainStep::new(POD_STEP, move |handles| {
                let namespace = handles.require(NAMESPACE_STEP)?.name().to_string();
                render_descriptor(
                    &pod_template.dir,
                    &pod_template.file,
                    &pod_context(&pod_template, &namespace),
                )
            })
            .ready_when(
                ReadinessTarget::new(ResourceState::RUNNING, timeouts.pod())
                    .abort_on(ResourceState::FAILED)
                    .abort_on(ResourceState::SUCCEEDED),
            ),
        )
        .step(
            ChainStep::new(SERVICE_STEP, move |handles| {
                let namespace = namespace_of(handles.require(POD_STEP)?.descriptor())?;
                render_descriptor(
                    &service_template.dir,
                    &service_template.file,
                    &service_context(&service, &namespace),
                )
            })
            .ready_when(ReadinessTarget::new(ResourceState::READY, timeouts.service())),
        )
        .step(
            ChainStep::new(ROUTE_STEP, move |handles| {
                let svc = handles.require(SERVICE_STEP)?;
                let namespace = namespace_of(svc.descriptor())?;
                ResourceDescriptor::route(Route::to_service(&route_name, &namespace, svc.name()))
            })
            .ready_when(ReadinessTarget::new(ResourceState::ADMITTED, timeouts.route())),
        )
}

/// Bring the chain up, run the checks against it and tear it down.
pub async fn run_webserver(
    api: Arc<dyn RemoteApi>,
    config: &HarnessConfig,
) -> ChainOutcome<CheckReport> {
    let chain = webserver_chain(api, config);
    let config = config.clone();

    chain
        .run(move |handles| Box::pin(async move { Ok(run_checks(handles, &config).await) }))
        .await
}

fn namespace_of(descriptor: &ResourceDescriptor) -> Result<String> {
    Ok(descriptor.id().require_namespace()?.to_string())
}
