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

use std::path::PathBuf;
use webserver_harness::domain::config::{ServiceSection, ServiceType, TemplateSection};
use webserver_harness::domain::webserver::{pod_context, service_context};
use webserver_harness::infrastructure::constants::DEFAULT_TEMPLATE_FILE;
use webserver_harness::{render, render_descriptor, HarnessError, RenderContext, ResourceKind};

fn template_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("templates/nginx_pod")
}

fn pod(namespace: &str) -> RenderContext {
    pod_context(&TemplateSection::default(), namespace)
}

#[test]
fn test_pod_manifest_uses_namespace() {
    let manifest = render(&template_dir(), DEFAULT_TEMPLATE_FILE, &pod("webserver-alice")).unwrap();
    assert!(manifest.starts_with("apiVersion: v1\nkind: Pod\n"));
    assert!(manifest.contains("  namespace: webserver-alice\n"));
    assert!(manifest.contains("image: nginxinc/nginx-unprivileged:stable"));
    assert!(manifest.contains("containerPort: 8080"));
    assert!(!manifest.contains("nodeName"));
    assert!(!manifest.contains("\n\n"));
}

#[test]
fn test_render_is_deterministic() {
    let ctx = pod("webserver-alice");
    let first = render(&template_dir(), DEFAULT_TEMPLATE_FILE, &ctx).unwrap();
    let second = render(&template_dir(), DEFAULT_TEMPLATE_FILE, &ctx).unwrap();
    assert_eq!(first.as_bytes(), second.as_bytes());
}

#[test]
fn test_pod_optional_values() {
    let template = TemplateSection {
        image: Some("nginx:1.27".to_string()),
        node_name: Some("worker-2".to_string()),
        container_port: 9090,
        ..Default::default()
    };
    let manifest = render(
        &template_dir(),
        DEFAULT_TEMPLATE_FILE,
        &pod_context(&template, "webserver-bob"),
    )
    .unwrap();
    assert!(manifest.contains("  nodeName: worker-2\n"));
    assert!(manifest.contains("image: nginx:1.27"));
    assert!(manifest.contains("containerPort: 9090"));
}

#[test]
fn test_service_manifest() {
    let service = ServiceSection {
        service_type: ServiceType::ClusterIP,
        port: 8081,
    };
    let manifest = render(
        &template_dir(),
        DEFAULT_TEMPLATE_FILE,
        &service_context(&service, "webserver-alice"),
    )
    .unwrap();
    assert!(manifest.contains("kind: Service\n"));
    assert!(manifest.contains("  type: ClusterIP\n"));
    assert!(manifest.contains("port: 8081"));
    assert!(manifest.contains("targetPort: http"));
}

#[test]
fn test_missing_namespace_is_render_error() {
    let ctx = RenderContext::new().with("kind", "Pod");
    let err = render(&template_dir(), DEFAULT_TEMPLATE_FILE, &ctx).unwrap_err();
    assert!(matches!(err, HarnessError::Render(_)), "got {:?}", err);
}

#[test]
fn test_unknown_kind_renders_nothing() {
    let ctx = RenderContext::new().with("kind", "Deployment").with("namespace", "ns");
    let manifest = render(&template_dir(), DEFAULT_TEMPLATE_FILE, &ctx).unwrap();
    assert!(manifest.trim().is_empty());
}

#[test]
fn test_render_descriptor_parses_both_kinds() {
    let pod = render_descriptor(&template_dir(), DEFAULT_TEMPLATE_FILE, &pod("webserver-alice"))
        .unwrap();
    assert_eq!(pod.kind(), ResourceKind::Pod);
    assert_eq!(pod.name(), "nginx");
    assert_eq!(pod.namespace_name(), Some("webserver-alice"));

    let service = render_descriptor(
        &template_dir(),
        DEFAULT_TEMPLATE_FILE,
        &service_context(&ServiceSection::default(), "webserver-alice"),
    )
    .unwrap();
    assert_eq!(service.kind(), ResourceKind::Service);
    assert_eq!(service.name(), "nginx-service");
    assert_eq!(service.id().to_string(), "Service webserver-alice/nginx-service");
}
