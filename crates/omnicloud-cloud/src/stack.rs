//! Stack context
//!
//! A [`Stack`] collects every declaration a deployment makes. Declaring is
//! synchronous and returns handles whose outputs are still pending; nothing
//! reaches the engine until [`Stack::finish`] drives the whole graph, so a
//! builder can wire outputs of one cloud into another before either exists.

use crate::engine::ProvisioningEngine;
use crate::error::{CloudError, Result};
use crate::output::Output;
use crate::resource::{ComponentResource, Resource, ResourceConfig, ResourceOptions, resource_key};
use futures_util::future;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

pub struct Stack {
    project: String,
    name: String,
    engine: Arc<dyn ProvisioningEngine>,
    pending: Vec<(String, Output<()>)>,
    exports: Vec<(String, Output<Value>)>,
}

impl Stack {
    pub fn new(
        project: impl Into<String>,
        name: impl Into<String>,
        engine: Arc<dyn ProvisioningEngine>,
    ) -> Self {
        Self {
            project: project.into(),
            name: name.into(),
            engine,
            pending: Vec::new(),
            exports: Vec::new(),
        }
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of declarations so far, components included
    pub fn declared(&self) -> usize {
        self.pending.len()
    }

    /// Declare a component that children can name as their parent
    pub fn component(&mut self, component_type: &str, name: &str) -> Result<ComponentResource> {
        self.declare(
            component_type,
            name,
            Value::Object(Default::default()),
            ResourceOptions::default(),
        )?;
        Ok(ComponentResource {
            component_type: component_type.to_string(),
            name: name.to_string(),
        })
    }

    /// Declare a resource
    ///
    /// The engine sees it once `args` and everything in `depends_on` have
    /// resolved.
    pub fn declare(
        &mut self,
        resource_type: &str,
        name: &str,
        args: impl Into<Output<Value>>,
        options: ResourceOptions,
    ) -> Result<Resource> {
        let key = resource_key(resource_type, name);
        if self.pending.iter().any(|(existing, _)| *existing == key) {
            return Err(CloudError::ResourceAlreadyExists(key));
        }

        let args = args.into();
        let engine = Arc::clone(&self.engine);
        let dependencies = Output::all(options.depends_on.iter().map(Resource::ready));

        let mut config = ResourceConfig::new(resource_type, name, Value::Null);
        config.parent = options.parent;
        config.retain_on_delete = options.retain_on_delete;
        config.depends_on = options.depends_on.iter().map(Resource::key).collect();

        let outputs = Output::new(async move {
            dependencies.resolve().await?;
            config.args = args.resolve().await?;
            tracing::debug!("Registering {} with {}", config.key(), engine.name());
            engine.register(config).await
        });

        tracing::debug!("Declared {}", key);
        self.pending.push((key, outputs.apply(|_| ())));

        Ok(Resource {
            resource_type: resource_type.to_string(),
            name: name.to_string(),
            outputs,
        })
    }

    /// Publish `value` as a stack output
    pub fn export(&mut self, name: impl Into<String>, value: Output<Value>) {
        let name = name.into();
        if self.exports.iter().any(|(existing, _)| *existing == name) {
            tracing::warn!("Stack output {} exported twice; keeping the last value", name);
        }
        self.exports.push((name, value));
    }

    pub fn export_str(&mut self, name: impl Into<String>, value: &Output<String>) {
        self.export(name, value.apply(Value::String));
    }

    pub fn export_strings(&mut self, name: impl Into<String>, value: &Output<Vec<String>>) {
        self.export(
            name,
            value.apply(|items| Value::Array(items.into_iter().map(Value::String).collect())),
        );
    }

    /// Register every declaration, then resolve the exports
    pub async fn finish(self) -> Result<StackOutputs> {
        tracing::info!(
            "Resolving {} declarations of {}/{}",
            self.pending.len(),
            self.project,
            self.name
        );
        future::try_join_all(self.pending.iter().map(|(_, done)| done.resolve())).await?;

        let mut outputs = StackOutputs::default();
        for (name, value) in &self.exports {
            outputs.0.insert(name.clone(), value.resolve().await?);
        }
        tracing::info!("Stack {} resolved {} outputs", self.name, outputs.len());
        Ok(outputs)
    }
}

/// Resolved stack outputs, sorted by name
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StackOutputs(BTreeMap<String, Value>);

impl StackOutputs {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for StackOutputs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.0 {
            match value {
                Value::String(s) => writeln!(f, "{name}: {s}")?,
                Value::Array(items) => {
                    let items: Vec<String> = items
                        .iter()
                        .map(|v| v.as_str().map_or_else(|| v.to_string(), str::to_string))
                        .collect();
                    writeln!(f, "{name}: {}", items.join(", "))?
                }
                other => writeln!(f, "{name}: {other}")?,
            }
        }
        Ok(())
    }
}
