//! Resource declarations

use crate::error::{CloudError, Result};
use crate::output::Output;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Attributes a provisioning engine reports for a registered resource
pub type ResourceOutputs = serde_json::Map<String, Value>;

/// A fully resolved resource declaration, as handed to the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// Type token (e.g., "aws:s3/bucket:Bucket")
    pub resource_type: String,

    /// Logical resource name, unique per type
    pub name: String,

    /// Provider name taken from the type token (e.g., "aws")
    pub provider: String,

    /// Key of the owning component, if any
    pub parent: Option<String>,

    /// Keys of resources that must be registered first
    #[serde(default)]
    pub depends_on: Vec<String>,

    /// Leave the cloud resource in place when the stack is destroyed
    #[serde(default)]
    pub retain_on_delete: bool,

    /// Resource-specific arguments
    pub args: Value,
}

impl ResourceConfig {
    pub fn new(resource_type: impl Into<String>, name: impl Into<String>, args: Value) -> Self {
        let resource_type = resource_type.into();
        Self {
            provider: provider_of(&resource_type).to_string(),
            resource_type,
            name: name.into(),
            parent: None,
            depends_on: Vec::new(),
            retain_on_delete: false,
            args,
        }
    }

    /// Get the full resource key (type::name)
    pub fn key(&self) -> String {
        resource_key(&self.resource_type, &self.name)
    }

    /// Get an argument as a specific type
    pub fn get_arg<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.args
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}

pub(crate) fn resource_key(resource_type: &str, name: &str) -> String {
    format!("{}::{}", resource_type, name)
}

/// Provider part of a type token: `aws` for `aws:s3/bucket:Bucket`
pub fn provider_of(resource_type: &str) -> &str {
    resource_type
        .split_once(':')
        .map_or(resource_type, |(provider, _)| provider)
}

/// Registered resources in registration order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceSet {
    resources: Vec<ResourceConfig>,
}

impl ResourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource; a second resource with the same key is rejected
    pub fn add(&mut self, resource: ResourceConfig) -> Result<()> {
        let key = resource.key();
        if self.resources.iter().any(|r| r.key() == key) {
            return Err(CloudError::ResourceAlreadyExists(key));
        }
        self.resources.push(resource);
        Ok(())
    }

    pub fn get(&self, resource_type: &str, name: &str) -> Option<&ResourceConfig> {
        self.resources
            .iter()
            .find(|r| r.resource_type == resource_type && r.name == name)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &ResourceConfig> {
        self.resources.iter()
    }

    pub fn by_type(&self, resource_type: &str) -> Vec<&ResourceConfig> {
        self.resources
            .iter()
            .filter(|r| r.resource_type == resource_type)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

/// A logical grouping of resources, such as one cloud's topology
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentResource {
    pub(crate) component_type: String,
    pub(crate) name: String,
}

impl ComponentResource {
    pub fn component_type(&self) -> &str {
        &self.component_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> String {
        resource_key(&self.component_type, &self.name)
    }
}

/// Options applied to a single declaration
#[derive(Debug, Clone, Default)]
pub struct ResourceOptions {
    pub parent: Option<String>,
    pub depends_on: Vec<Resource>,
    pub retain_on_delete: bool,
}

impl ResourceOptions {
    /// Options for a child of `component`
    pub fn child_of(component: &ComponentResource) -> Self {
        Self {
            parent: Some(component.key()),
            ..Self::default()
        }
    }

    pub fn depends_on(mut self, resource: &Resource) -> Self {
        self.depends_on.push(resource.clone());
        self
    }

    pub fn retain_on_delete(mut self, retain: bool) -> Self {
        self.retain_on_delete = retain;
        self
    }
}

/// Handle to a declared resource
#[derive(Debug, Clone)]
pub struct Resource {
    pub(crate) resource_type: String,
    pub(crate) name: String,
    pub(crate) outputs: Output<ResourceOutputs>,
}

impl Resource {
    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> String {
        resource_key(&self.resource_type, &self.name)
    }

    /// Every attribute the engine reported
    pub fn outputs(&self) -> Output<ResourceOutputs> {
        self.outputs.clone()
    }

    /// Resolves once the resource is registered
    pub fn ready(&self) -> Output<()> {
        self.outputs.apply(|_| ())
    }

    pub fn output(&self, key: &str) -> Output<Value> {
        let resource = self.key();
        let key = key.to_string();
        self.outputs.try_apply(move |outputs| {
            outputs
                .get(&key)
                .cloned()
                .ok_or(CloudError::MissingOutput {
                    resource,
                    output: key,
                })
        })
    }

    pub fn output_str(&self, key: &str) -> Output<String> {
        let resource = self.key();
        let output = key.to_string();
        self.output(key).try_apply(move |value| match value {
            Value::String(s) => Ok(s),
            other => Err(CloudError::InvalidOutput {
                resource,
                output,
                reason: format!("expected a string, got {other}"),
            }),
        })
    }

    pub fn output_strings(&self, key: &str) -> Output<Vec<String>> {
        let resource = self.key();
        let output = key.to_string();
        self.output(key).try_apply(move |value| {
            serde_json::from_value::<Vec<String>>(value).map_err(|e| CloudError::InvalidOutput {
                resource,
                output,
                reason: e.to_string(),
            })
        })
    }

    /// The engine-assigned id
    pub fn id(&self) -> Output<String> {
        self.output_str("id")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resource_with(outputs: Value) -> Resource {
        let Value::Object(map) = outputs else {
            panic!("outputs must be an object");
        };
        Resource {
            resource_type: "aws:s3/bucket:Bucket".to_string(),
            name: "origin".to_string(),
            outputs: Output::known(map),
        }
    }

    #[test]
    fn test_provider_of() {
        assert_eq!(provider_of("aws:s3/bucket:Bucket"), "aws");
        assert_eq!(provider_of("azure-native:storage:StorageAccount"), "azure-native");
        assert_eq!(provider_of("plain"), "plain");
    }

    #[test]
    fn test_resource_config() {
        let config = ResourceConfig::new(
            "gcp:dns/recordSet:RecordSet",
            "www",
            json!({ "ttl": 300, "type": "CNAME" }),
        );
        assert_eq!(config.provider, "gcp");
        assert_eq!(config.key(), "gcp:dns/recordSet:RecordSet::www");
        assert_eq!(config.get_arg::<u32>("ttl"), Some(300));
        assert_eq!(config.get_arg::<u32>("missing"), None);
    }

    #[test]
    fn test_resource_set_rejects_duplicates() {
        let mut set = ResourceSet::new();
        set.add(ResourceConfig::new("aws:s3/bucket:Bucket", "a", json!({})))
            .unwrap();
        set.add(ResourceConfig::new("aws:s3/bucket:Bucket", "b", json!({})))
            .unwrap();

        let err = set
            .add(ResourceConfig::new("aws:s3/bucket:Bucket", "a", json!({})))
            .unwrap_err();
        assert_eq!(
            err,
            CloudError::ResourceAlreadyExists("aws:s3/bucket:Bucket::a".to_string())
        );
        assert_eq!(set.len(), 2);
        assert_eq!(set.by_type("aws:s3/bucket:Bucket").len(), 2);
        assert!(set.get("aws:s3/bucket:Bucket", "b").is_some());
    }

    #[tokio::test]
    async fn test_resource_outputs() {
        let resource = resource_with(json!({
            "id": "origin-bucket",
            "name_servers": ["ns1.example.", "ns2.example."],
            "ttl": 60,
        }));

        assert_eq!(resource.id().resolve().await.unwrap(), "origin-bucket");
        assert_eq!(
            resource.output_strings("name_servers").resolve().await.unwrap(),
            vec!["ns1.example.", "ns2.example."]
        );
        assert!(matches!(
            resource.output_str("ttl").resolve().await,
            Err(CloudError::InvalidOutput { .. })
        ));
        assert!(matches!(
            resource.output("nope").resolve().await,
            Err(CloudError::MissingOutput { .. })
        ));
    }
}
