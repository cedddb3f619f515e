//! Typed stack configuration

use crate::error::Result;
use crate::values::ConfigValues;
use serde::Serialize;

pub const DOMAIN_NAME: &str = "domain_name";
pub const ENVIRONMENT: &str = "environment";
pub const AWS_BUCKET_NAME: &str = "aws_bucket_name";
pub const ENABLE_AZURE_BACKUP: &str = "enable_azure_backup";
pub const PROJECT_NAME: &str = "project_name";
pub const ENABLE_PUBLIC_ACCESS_BLOCK: &str = "enable_public_access_block";
pub const BACKUP_RETENTION_DAYS: &str = "backup_retention_days";
pub const GCP_PRIMARY_TTL: &str = "gcp_primary_ttl";
pub const GCP_BACKUP_TTL: &str = "gcp_backup_ttl";

/// Every key a stack must define
pub const REQUIRED_KEYS: [&str; 9] = [
    DOMAIN_NAME,
    ENVIRONMENT,
    AWS_BUCKET_NAME,
    ENABLE_AZURE_BACKUP,
    PROJECT_NAME,
    ENABLE_PUBLIC_ACCESS_BLOCK,
    BACKUP_RETENTION_DAYS,
    GCP_PRIMARY_TTL,
    GCP_BACKUP_TTL,
];

/// Settings for one stack
///
/// Built once when the process starts and handed to every builder by
/// reference. Nothing mutates it afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackConfiguration {
    /// Domain for the Cloud DNS managed zone and its records
    pub domain_name: String,

    /// Environment label used in resource naming (e.g. `dev`, `prod`)
    pub environment: String,

    /// S3 bucket name; must be globally unique
    pub aws_bucket_name: String,

    /// Turn on Azure blob and container soft-delete
    pub enable_azure_backup: bool,

    /// Project name used in resource naming
    pub project_name: String,

    /// Apply S3 Block Public Access to the bucket
    pub enable_public_access_block: bool,

    /// Soft-delete retention in days
    pub backup_retention_days: u32,

    /// TTL in seconds of the primary (`www`) CNAME
    pub gcp_primary_ttl: u32,

    /// TTL in seconds of the backup CNAME
    pub gcp_backup_ttl: u32,
}

impl StackConfiguration {
    /// Read every required key from `values`
    ///
    /// Fails on the first absent key with `MissingConfiguration`.
    pub fn from_values(values: &ConfigValues) -> Result<Self> {
        Ok(Self {
            domain_name: values.require_str(DOMAIN_NAME)?,
            environment: values.require_str(ENVIRONMENT)?,
            aws_bucket_name: values.require_str(AWS_BUCKET_NAME)?,
            enable_azure_backup: values.require_bool(ENABLE_AZURE_BACKUP)?,
            project_name: values.require_str(PROJECT_NAME)?,
            enable_public_access_block: values.require_bool(ENABLE_PUBLIC_ACCESS_BLOCK)?,
            backup_retention_days: values.require_positive_u32(BACKUP_RETENTION_DAYS)?,
            gcp_primary_ttl: values.require_positive_u32(GCP_PRIMARY_TTL)?,
            gcp_backup_ttl: values.require_positive_u32(GCP_BACKUP_TTL)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    const FULL_STACK: &str = r#"
config:
  omnicloud:domain_name: example.com
  omnicloud:environment: dev
  omnicloud:aws_bucket_name: omnicloud-dev-origin
  omnicloud:enable_azure_backup: "true"
  omnicloud:project_name: omnicloud-resilience
  omnicloud:enable_public_access_block: true
  omnicloud:backup_retention_days: 7
  omnicloud:gcp_primary_ttl: 300
  omnicloud:gcp_backup_ttl: 60
"#;

    #[test]
    fn test_from_values() {
        let values = ConfigValues::from_yaml_str(FULL_STACK).unwrap();
        let config = StackConfiguration::from_values(&values).unwrap();

        assert_eq!(config.domain_name, "example.com");
        assert_eq!(config.environment, "dev");
        assert_eq!(config.aws_bucket_name, "omnicloud-dev-origin");
        assert!(config.enable_azure_backup);
        assert_eq!(config.project_name, "omnicloud-resilience");
        assert!(config.enable_public_access_block);
        assert_eq!(config.backup_retention_days, 7);
        assert_eq!(config.gcp_primary_ttl, 300);
        assert_eq!(config.gcp_backup_ttl, 60);
    }

    #[test]
    fn test_each_key_is_required() {
        for key in REQUIRED_KEYS {
            let content: String = FULL_STACK
                .lines()
                .filter(|line| !line.contains(&format!("omnicloud:{key}:")))
                .map(|line| format!("{line}\n"))
                .collect();
            let values = ConfigValues::from_yaml_str(&content).unwrap();

            match StackConfiguration::from_values(&values) {
                Err(ConfigError::MissingConfiguration(missing)) => assert_eq!(missing, key),
                other => panic!("Expected MissingConfiguration({key}), got {other:?}"),
            }
        }
    }

    #[test]
    fn test_invalid_ttl() {
        let content = FULL_STACK.replace("gcp_backup_ttl: 60", "gcp_backup_ttl: 0");
        let values = ConfigValues::from_yaml_str(&content).unwrap();

        match StackConfiguration::from_values(&values) {
            Err(ConfigError::InvalidValue { key, .. }) => assert_eq!(key, GCP_BACKUP_TTL),
            other => panic!("Expected InvalidValue, got {other:?}"),
        }
    }
}
