//! Webserver harness commands

use crate::cli::display::TableRenderer;
use crate::domain::config::{
    apply_to_harness_config, parse_dynamic_configs, HarnessConfig, ServiceType,
};
use crate::domain::resource::ResourceId;
use crate::domain::webserver::{pod_context, run_webserver, service_context};
use crate::infrastructure::constants::DEFAULT_TEMPLATE_FILE;
use crate::infrastructure::kubernetes::{KubeRemoteApi, RemoteApi};
use crate::infrastructure::template::{render, RenderContext};
use clap::Parser;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug, Clone)]
pub struct RunCommand {
    /// Path to a harness configuration file (TOML)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Path to kubeconfig file
    /// If not specified, uses default kubeconfig resolution (KUBECONFIG env or ~/.kube/config)
    #[arg(long)]
    pub kubeconfig: Option<String>,

    /// Kubernetes context to use
    #[arg(long)]
    pub context: Option<String>,

    /// Directory holding the manifest template
    #[arg(long, value_name = "DIR")]
    pub template_dir: Option<PathBuf>,

    /// Service type (ClusterIP, NodePort, LoadBalancer)
    #[arg(long)]
    pub service_type: Option<String>,

    /// Dynamic configuration properties (-D key=value)
    ///
    /// Cluster: cluster.kubeconfig, cluster.context
    /// Template: template.dir, template.file, template.image, template.container-port, template.node-name
    /// Service: service.type, service.port
    /// Route: route.name, route.port
    /// Timeouts: timeouts.namespace, timeouts.pod, timeouts.service, timeouts.route (seconds), timeouts.poll-interval-ms
    ///
    /// Example: -Dtimeouts.pod=120 -Dtemplate.image=nginxinc/nginx-unprivileged:1.27
    #[arg(short = 'D', value_name = "KEY=VALUE")]
    pub properties: Vec<String>,
}

impl RunCommand {
    /// Resolve configuration: flags > -D properties > config file > defaults.
    pub fn resolve_config(&self) -> anyhow::Result<HarnessConfig> {
        let mut config = HarnessConfig::load(self.config.as_deref())?;

        if !self.properties.is_empty() {
            let dynamic_configs = parse_dynamic_configs(&self.properties)?;
            apply_to_harness_config(&dynamic_configs, &mut config)?;
        }

        if let Some(path) = &self.kubeconfig {
            config.cluster.kubeconfig = Some(path.clone());
        }
        if let Some(context) = &self.context {
            config.cluster.context = Some(context.clone());
        }
        if let Some(dir) = &self.template_dir {
            config.template.dir = dir.clone();
        }
        if let Some(service_type) = &self.service_type {
            config.service.service_type = service_type.parse::<ServiceType>()?;
        }

        let config = config.with_operator_from_env()?;
        config.validate()?;
        Ok(config)
    }

    pub async fn execute(&self) -> anyhow::Result<()> {
        let config = self.resolve_config()?;
        let namespace = config.namespace_name();

        let api: Arc<dyn RemoteApi> = Arc::new(
            KubeRemoteApi::new_with_config(
                config.cluster.kubeconfig.clone(),
                config.cluster.context.clone(),
            )
            .await?,
        );

        println!("ℹ️  Running webserver chain in namespace {}", namespace);
        let outcome = run_webserver(api, &config).await;

        let renderer = TableRenderer::new();
        println!("{}", renderer.render_chain_report(&outcome.report));

        for step in outcome.report.teardown_failures() {
            println!(
                "⚠️  Teardown of step '{}' failed; run `webserver-harness cleanup` to remove leftovers",
                step.name
            );
        }

        let checks = outcome
            .result
            .map_err(|e| anyhow::anyhow!("Webserver chain failed: {}", e))?;
        println!("{}", renderer.render_check_report(&checks));

        let failed = checks.failures().count();
        if failed > 0 {
            anyhow::bail!("{} webserver check(s) failed", failed);
        }

        println!("✅ All webserver checks passed");
        Ok(())
    }
}

#[derive(Parser, Debug, Clone)]
pub struct RenderCommand {
    /// Kind to render (Pod or Service)
    #[arg(long)]
    pub kind: String,

    /// Namespace placed in the manifest; defaults to webserver-$USER
    #[arg(long, short = 'n')]
    pub namespace: Option<String>,

    #[arg(long, value_name = "DIR")]
    pub template_dir: Option<PathBuf>,

    /// Template file name inside the template directory
    #[arg(long, default_value = DEFAULT_TEMPLATE_FILE)]
    pub template: String,

    /// Extra placeholder values (key=value)
    #[arg(long, value_name = "KEY=VALUE")]
    pub set: Vec<String>,
}

impl RenderCommand {
    pub fn context(&self, config: &HarnessConfig, namespace: &str) -> anyhow::Result<RenderContext> {
        let mut ctx = match self.kind.as_str() {
            "Pod" => pod_context(&config.template, namespace),
            "Service" => service_context(&config.service, namespace),
            other => anyhow::bail!("Cannot render kind '{}' (expected Pod or Service)", other),
        };

        for (key, value) in parse_dynamic_configs(&self.set)? {
            ctx.insert(key, placeholder_value(&value));
        }
        Ok(ctx)
    }

    pub fn execute(&self) -> anyhow::Result<()> {
        let mut config = HarnessConfig::default();
        if let Some(dir) = &self.template_dir {
            config.template.dir = dir.clone();
        }

        let namespace = match &self.namespace {
            Some(ns) => ns.clone(),
            None => config.clone().with_operator_from_env()?.namespace_name(),
        };

        let ctx = self.context(&config, &namespace)?;
        let manifest = render(&config.template.dir, &self.template, &ctx)?;
        println!("{}", manifest);
        Ok(())
    }
}

/// Numbers and booleans keep their type so templates can compare them.
fn placeholder_value(raw: &str) -> Value {
    if let Ok(n) = raw.parse::<i64>() {
        Value::from(n)
    } else if let Ok(b) = raw.parse::<bool>() {
        Value::from(b)
    } else {
        Value::from(raw)
    }
}

#[derive(Parser, Debug, Clone)]
pub struct CleanupCommand {
    #[arg(long)]
    pub kubeconfig: Option<String>,

    #[arg(long)]
    pub context: Option<String>,
}

impl CleanupCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let config = HarnessConfig::default().with_operator_from_env()?;
        config.validate()?;
        let namespace = config.namespace_name();

        let api = KubeRemoteApi::new_with_config(self.kubeconfig.clone(), self.context.clone())
            .await?;

        match api.delete(&ResourceId::namespace(&namespace)).await {
            Ok(()) => {
                info!(namespace = %namespace, "Deleted leftover namespace");
                println!("✅ Deleted namespace {}", namespace);
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                println!("ℹ️  Namespace {} not found, nothing to clean up", namespace);
                Ok(())
            }
            Err(e) => Err(anyhow::anyhow!("Failed to delete namespace {}: {}", namespace, e)),
        }
    }
}
