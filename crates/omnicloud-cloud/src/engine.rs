//! Provisioning engine seam
//!
//! The engine owns everything this repository does not: talking to cloud APIs,
//! state, diffing, retries. Builders only ever see [`ProvisioningEngine`].
//! [`PreviewEngine`] is the in-process implementation used for previews and
//! tests; it records what would be created and makes up plausible outputs.

use crate::action::Plan;
use crate::error::{CloudError, Result};
use crate::resource::{ResourceConfig, ResourceOutputs, ResourceSet};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Provisioning engine abstraction trait
#[async_trait]
pub trait ProvisioningEngine: Send + Sync {
    /// Returns the engine name (e.g., "preview")
    fn name(&self) -> &str;

    /// Register a resolved declaration and return its outputs
    ///
    /// `resource.args` must be a JSON object.
    async fn register(&self, resource: ResourceConfig) -> Result<ResourceOutputs>;
}

/// Fills in the outputs a real provider would compute for a resource
pub type OutputResolver = fn(&ResourceConfig, &mut ResourceOutputs);

/// In-memory engine that records registrations without provisioning anything
#[derive(Default)]
pub struct PreviewEngine {
    resources: Mutex<ResourceSet>,
    resolvers: HashMap<String, OutputResolver>,
}

impl PreviewEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `resolver` for every resource whose type token starts with `provider:`
    pub fn with_provider(mut self, provider: impl Into<String>, resolver: OutputResolver) -> Self {
        self.resolvers.insert(provider.into(), resolver);
        self
    }

    /// Everything registered so far, in registration order
    pub async fn resources(&self) -> ResourceSet {
        self.resources.lock().await.clone()
    }

    /// Actions `up` would take
    pub async fn plan(&self) -> Plan {
        Plan::create(&*self.resources.lock().await)
    }

    /// Actions `destroy` would take
    pub async fn destroy_plan(&self) -> Plan {
        Plan::destroy(&*self.resources.lock().await)
    }
}

#[async_trait]
impl ProvisioningEngine for PreviewEngine {
    fn name(&self) -> &str {
        "preview"
    }

    async fn register(&self, resource: ResourceConfig) -> Result<ResourceOutputs> {
        let mut outputs = match &resource.args {
            Value::Object(args) => args.clone(),
            other => {
                return Err(CloudError::ProvisioningFailed(format!(
                    "arguments of {} must be an object, got {}",
                    resource.key(),
                    other
                )));
            }
        };
        outputs
            .entry("id")
            .or_insert_with(|| Value::String(resource.name.clone()));
        outputs.insert("urn".to_string(), Value::String(resource.key()));

        if let Some(resolver) = self.resolvers.get(&resource.provider) {
            resolver(&resource, &mut outputs);
        }

        tracing::debug!(
            "Preview registered {} ({} outputs)",
            resource.key(),
            outputs.len()
        );
        self.resources.lock().await.add(resource)?;
        Ok(outputs)
    }
}
