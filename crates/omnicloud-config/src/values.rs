//! Raw key/value configuration read from a stack file
//!
//! Stack files use the provisioning engine's layout:
//!
//! ```yaml
//! config:
//!   omnicloud:domain_name: example.com
//!   omnicloud:enable_azure_backup: "true"
//!   aws:region: us-east-1
//! ```
//!
//! Keys in the `omnicloud:` namespace are stored without the prefix, and take
//! precedence over the same key written bare. Other namespaces are kept as-is.

use crate::error::{ConfigError, Result};
use serde::Deserialize;
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Namespace of this project's keys in a stack file
pub const CONFIG_NAMESPACE: &str = "omnicloud";

/// Prefix of per-key environment overrides (`OMNICLOUD_DOMAIN_NAME`, ...)
pub const ENV_PREFIX: &str = "OMNICLOUD_";

#[derive(Debug, Deserialize)]
struct StackDocument {
    #[serde(default)]
    config: BTreeMap<String, Value>,
}

/// Untyped configuration values keyed by bare key name
#[derive(Debug, Clone, Default)]
pub struct ConfigValues {
    values: BTreeMap<String, Value>,
}

impl ConfigValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a stack file's contents
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Self::parse(content, Path::new("<string>"))
    }

    /// Read and parse a stack file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &Path) -> Result<Self> {
        // An empty file deserializes to null rather than a mapping.
        if content.trim().is_empty() {
            return Ok(Self::new());
        }

        let document: StackDocument =
            serde_yaml::from_str(content).map_err(|source| ConfigError::Yaml {
                path: path.to_path_buf(),
                source,
            })?;

        let namespace = format!("{CONFIG_NAMESPACE}:");
        let mut values = BTreeMap::new();
        for (key, value) in document.config {
            match key.strip_prefix(&namespace) {
                Some(bare) => {
                    values.insert(bare.to_string(), value);
                }
                None => {
                    values.entry(key).or_insert(value);
                }
            }
        }

        tracing::debug!("Parsed {} configuration values from {}", values.len(), path.display());
        Ok(Self { values })
    }

    /// Override `keys` from `OMNICLOUD_<KEY>` environment variables
    pub fn with_env_overrides(mut self, keys: &[&str]) -> Self {
        for key in keys {
            let var = format!("{ENV_PREFIX}{}", key.to_uppercase());
            if let Ok(value) = std::env::var(&var) {
                tracing::debug!("Configuration key {} overridden by {}", key, var);
                self.values.insert((*key).to_string(), Value::String(value));
            }
        }
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn require(&self, key: &str) -> Result<&Value> {
        match self.values.get(key) {
            None | Some(Value::Null) => Err(ConfigError::MissingConfiguration(key.to_string())),
            Some(Value::Mapping(_)) => Err(ConfigError::invalid(
                key,
                "<mapping>",
                "encrypted or structured values are not supported",
            )),
            Some(value) => Ok(value),
        }
    }

    /// A required, non-blank string
    pub fn require_str(&self, key: &str) -> Result<String> {
        let value = match self.require(key)? {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            other => return Err(ConfigError::invalid(key, describe(other), "expected a string")),
        };
        if value.trim().is_empty() {
            return Err(ConfigError::invalid(key, value, "must not be empty"));
        }
        Ok(value)
    }

    /// A required boolean: YAML booleans, `1/true/yes/on` or `0/false/no/off`
    pub fn require_bool(&self, key: &str) -> Result<bool> {
        match self.require(key)? {
            Value::Bool(b) => Ok(*b),
            Value::Number(n) => match n.as_u64() {
                Some(1) => Ok(true),
                Some(0) => Ok(false),
                _ => Err(ConfigError::invalid(key, n.to_string(), "expected a boolean")),
            },
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                _ => Err(ConfigError::invalid(key, s.as_str(), "expected a boolean")),
            },
            other => Err(ConfigError::invalid(key, describe(other), "expected a boolean")),
        }
    }

    /// A required integer in `1..=u32::MAX`
    pub fn require_positive_u32(&self, key: &str) -> Result<u32> {
        let raw = match self.require(key)? {
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.trim().to_string(),
            other => return Err(ConfigError::invalid(key, describe(other), "expected an integer")),
        };
        let number: i64 = raw
            .parse()
            .map_err(|_| ConfigError::invalid(key, raw.as_str(), "expected an integer"))?;
        if number <= 0 {
            return Err(ConfigError::invalid(key, raw, "must be positive"));
        }
        u32::try_from(number).map_err(|_| ConfigError::invalid(key, raw, "is too large"))
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Sequence(_) => "<sequence>".to_string(),
        Value::Mapping(_) => "<mapping>".to_string(),
        Value::Tagged(tagged) => tagged.tag.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_namespaced_keys_are_stripped() {
        let values = ConfigValues::from_yaml_str(
            "config:\n  omnicloud:domain_name: example.com\n  aws:region: us-east-1\n",
        )
        .unwrap();

        assert_eq!(values.require_str("domain_name").unwrap(), "example.com");
        assert!(values.contains_key("aws:region"));
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn test_namespaced_key_wins_over_bare() {
        let values = ConfigValues::from_yaml_str(
            "config:\n  omnicloud:environment: prod\n  environment: dev\n",
        )
        .unwrap();
        assert_eq!(values.require_str("environment").unwrap(), "prod");
    }

    #[test]
    fn test_empty_file() {
        let values = ConfigValues::from_yaml_str("").unwrap();
        assert!(values.is_empty());
    }

    #[test]
    fn test_invalid_yaml() {
        let result = ConfigValues::from_yaml_str("config: [unclosed");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn test_missing_key() {
        let values = ConfigValues::new();
        match values.require_str("domain_name") {
            Err(ConfigError::MissingConfiguration(key)) => assert_eq!(key, "domain_name"),
            other => panic!("Expected MissingConfiguration, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_string_rejected() {
        let mut values = ConfigValues::new();
        values.set("domain_name", "  ");
        assert!(matches!(
            values.require_str("domain_name"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_secure_value_rejected() {
        let values =
            ConfigValues::from_yaml_str("config:\n  omnicloud:domain_name:\n    secure: AAABAx\n")
                .unwrap();
        assert!(matches!(
            values.require_str("domain_name"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_require_bool() {
        let mut values = ConfigValues::new();
        values.set("a", true);
        values.set("b", "Yes");
        values.set("c", "0");
        values.set("d", "off");
        values.set("e", "maybe");

        assert!(values.require_bool("a").unwrap());
        assert!(values.require_bool("b").unwrap());
        assert!(!values.require_bool("c").unwrap());
        assert!(!values.require_bool("d").unwrap());
        assert!(matches!(
            values.require_bool("e"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_require_positive_u32() {
        let values = ConfigValues::from_yaml_str(
            "config:\n  ttl: 300\n  quoted: \"60\"\n  zero: 0\n  negative: -5\n  text: soon\n",
        )
        .unwrap();

        assert_eq!(values.require_positive_u32("ttl").unwrap(), 300);
        assert_eq!(values.require_positive_u32("quoted").unwrap(), 60);
        assert!(values.require_positive_u32("zero").is_err());
        assert!(values.require_positive_u32("negative").is_err());
        assert!(values.require_positive_u32("text").is_err());
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        let mut values = ConfigValues::new();
        values.set("gcp_backup_ttl", 60);

        temp_env::with_var("OMNICLOUD_GCP_BACKUP_TTL", Some("30"), || {
            let values = values.clone().with_env_overrides(&["gcp_backup_ttl"]);
            assert_eq!(values.require_positive_u32("gcp_backup_ttl").unwrap(), 30);
        });
    }
}
