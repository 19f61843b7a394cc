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

//! Manifest templates rendered with minijinja.
//!
//! Every render uses the same environment settings (`trim_blocks`,
//! `lstrip_blocks`, semi-strict undefined) so that identical input produces
//! byte-identical manifests. Undefined values are falsy inside `{% if %}` but
//! fail when printed, which is how templates mark placeholders as required.

use crate::domain::resource::ResourceDescriptor;
use crate::shared::error::{HarnessError, Result};
use minijinja::{Environment, ErrorKind, UndefinedBehavior};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Placeholder values substituted into a template
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RenderContext(BTreeMap<String, Value>);

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for RenderContext {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut ctx = Self::new();
        for (k, v) in iter {
            ctx.insert(k, v);
        }
        ctx
    }
}

fn environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.set_undefined_behavior(UndefinedBehavior::SemiStrict);
    env
}

/// Render `template_name` from `template_dir` with `context`.
pub fn render(template_dir: &Path, template_name: &str, context: &RenderContext) -> Result<String> {
    let path = resolve_template_path(template_dir, template_name)?;

    let source = std::fs::read_to_string(&path).map_err(|e| {
        HarnessError::Template(format!(
            "Failed to read template file {}: {}",
            path.display(),
            e
        ))
    })?;

    let env = environment();
    let template = env.template_from_str(&source).map_err(|e| {
        error!(template = %path.display(), error = %e, "Failed to load template");
        HarnessError::Template(format!("Malformed template {}: {}", path.display(), e))
    })?;

    let rendered = template.render(context).map_err(|e| {
        error!(template = %path.display(), error = %e, "Failed to render template");
        match e.kind() {
            ErrorKind::UndefinedError => HarnessError::Render(format!(
                "Missing placeholder value in {}: {}",
                path.display(),
                e
            )),
            _ => HarnessError::Template(format!(
                "Failed to render template {}: {}",
                path.display(),
                e
            )),
        }
    })?;

    debug!(template = %path.display(), bytes = rendered.len(), "Rendered template");
    Ok(rendered)
}

/// Render a template and parse the result into a resource descriptor.
pub fn render_descriptor(
    template_dir: &Path,
    template_name: &str,
    context: &RenderContext,
) -> Result<ResourceDescriptor> {
    let manifest = render(template_dir, template_name, context)?;
    ResourceDescriptor::from_manifest(&manifest)
}

pub fn resolve_template_path(template_dir: &Path, template_name: &str) -> Result<PathBuf> {
    let dir = if template_dir.is_absolute() {
        template_dir.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|e| HarnessError::Template(format!("Cannot get current directory: {}", e)))?
            .join(template_dir)
    };

    let path = dir.join(template_name);
    if !path.is_file() {
        return Err(HarnessError::Template(format!(
            "Template file does not exist: {}",
            path.display()
        )));
    }

    Ok(path)
}
