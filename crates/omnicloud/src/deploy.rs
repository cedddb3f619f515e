//! デプロイメント全体の組み立て
//!
//! 設定 → AWS → Azure → GCP の順に宣言し、AWS と Azure の出力を GCP の
//! CNAME ターゲットとしてつなぐ。

use omnicloud_cloud::{PreviewEngine, Result, Stack};
use omnicloud_cloud_aws::{AwsInfra, AwsInfraArgs};
use omnicloud_cloud_azure::{AzureInfra, AzureInfraArgs, storage_account_name};
use omnicloud_cloud_gcp::{BACKUP_LABEL, GcpInfra, GcpInfraArgs, PRIMARY_LABEL};
use omnicloud_config::StackConfiguration;
use omnicloud_naming::{DomainName, StorageAccountNameRules, component_name};

pub const AWS_PREFIX: &str = "aws";
pub const AZURE_PREFIX: &str = "azure";
pub const GCP_PREFIX: &str = "gcp";

/// スタック出力名
pub const EXPORT_CLOUDFRONT_URL: &str = "aws_cloudfront_url";
pub const EXPORT_CLOUDFRONT_DOMAIN: &str = "aws_cloudfront_domain";
pub const EXPORT_AZURE_PRIMARY_ENDPOINT: &str = "azure_primary_endpoint";
pub const EXPORT_GCP_NAME_SERVERS: &str = "gcp_name_servers";

/// 設定から決まる名前（プロビジョニング前に確定する）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentNames {
    pub aws: String,
    pub azure: String,
    pub gcp: String,
    pub storage_account: String,
    pub zone: DomainName,
    pub primary_record: DomainName,
    pub backup_record: DomainName,
}

impl DeploymentNames {
    pub fn derive(config: &StackConfiguration) -> omnicloud_naming::Result<Self> {
        Self::derive_with(config, &azure_args(config).name_rules)
    }

    /// `rules` must be the ones the Azure builder receives
    pub fn derive_with(
        config: &StackConfiguration,
        rules: &StorageAccountNameRules,
    ) -> omnicloud_naming::Result<Self> {
        let name = |prefix: &str| component_name(prefix, &config.project_name, &config.environment);
        let azure = name(AZURE_PREFIX)?;
        let storage_account = storage_account_name(rules, &azure)?;

        Ok(Self {
            aws: name(AWS_PREFIX)?,
            gcp: name(GCP_PREFIX)?,
            azure,
            storage_account,
            zone: DomainName::parse(&config.domain_name)?,
            primary_record: DomainName::from_parts(PRIMARY_LABEL, &config.domain_name)?,
            backup_record: DomainName::from_parts(BACKUP_LABEL, &config.domain_name)?,
        })
    }
}

/// 宣言済みの3クラウド分のコンポーネント
pub struct Deployment {
    pub names: DeploymentNames,
    pub aws: AwsInfra,
    pub azure: AzureInfra,
    pub gcp: GcpInfra,
}

/// 設定から Azure コンポーネントの引数を作る
pub fn azure_args(config: &StackConfiguration) -> AzureInfraArgs {
    AzureInfraArgs {
        enable_backup: config.enable_azure_backup,
        backup_retention_days: config.backup_retention_days,
        ..AzureInfraArgs::default()
    }
}

/// `config` に従って全リソースを `stack` に宣言し、出力をエクスポートする
pub fn build(stack: &mut Stack, config: &StackConfiguration) -> Result<Deployment> {
    build_with(stack, config, azure_args(config))
}

/// [`build`] に Azure の引数を明示して渡す
pub fn build_with(
    stack: &mut Stack,
    config: &StackConfiguration,
    azure_args: AzureInfraArgs,
) -> Result<Deployment> {
    let names = DeploymentNames::derive_with(config, &azure_args.name_rules)?;

    let aws = AwsInfra::new(
        stack,
        &names.aws,
        AwsInfraArgs {
            bucket_name: config.aws_bucket_name.clone(),
            enable_public_access_block: config.enable_public_access_block,
        },
    )?;

    let azure = AzureInfra::new(stack, &names.azure, azure_args)?;

    // プライマリは CloudFront、バックアップは Azure の静的サイト
    let gcp_args = GcpInfraArgs {
        domain_name: config.domain_name.clone(),
        primary_target: aws.cloudfront_domain_name.clone(),
        backup_target: Some(azure.primary_host.clone()),
        primary_ttl: config.gcp_primary_ttl,
        backup_ttl: config.gcp_backup_ttl,
    };
    let gcp = GcpInfra::new(stack, &names.gcp, gcp_args)?;

    stack.export_str(EXPORT_CLOUDFRONT_URL, &aws.cloudfront_url);
    stack.export_str(EXPORT_CLOUDFRONT_DOMAIN, &aws.cloudfront_domain_name);
    stack.export_str(EXPORT_AZURE_PRIMARY_ENDPOINT, &azure.primary_endpoint);
    stack.export_strings(EXPORT_GCP_NAME_SERVERS, &gcp.name_servers);

    tracing::info!(
        "Declared {} resources for {}/{}",
        stack.declared(),
        stack.project(),
        stack.name()
    );

    Ok(Deployment {
        names,
        aws,
        azure,
        gcp,
    })
}

/// 全プロバイダーのプレビュー出力を持つエンジン
pub fn preview_engine() -> PreviewEngine {
    PreviewEngine::new()
        .with_provider(omnicloud_cloud_aws::PROVIDER, omnicloud_cloud_aws::preview_outputs)
        .with_provider(omnicloud_cloud_azure::PROVIDER, omnicloud_cloud_azure::preview_outputs)
        .with_provider(omnicloud_cloud_gcp::PROVIDER, omnicloud_cloud_gcp::preview_outputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use omnicloud_cloud::{ActionType, CloudError};
    use serde_json::json;
    use std::sync::Arc;

    fn config() -> StackConfiguration {
        StackConfiguration {
            domain_name: "example.com".to_string(),
            environment: "dev".to_string(),
            aws_bucket_name: "omnicloud-dev-origin".to_string(),
            enable_azure_backup: true,
            project_name: "omnicloud".to_string(),
            enable_public_access_block: true,
            backup_retention_days: 14,
            gcp_primary_ttl: 300,
            gcp_backup_ttl: 60,
        }
    }

    #[test]
    fn test_derive_names() {
        let names = DeploymentNames::derive(&config()).unwrap();
        assert_eq!(names.aws, "aws-omnicloud-dev");
        assert_eq!(names.azure, "azure-omnicloud-dev");
        assert_eq!(names.gcp, "gcp-omnicloud-dev");
        assert_eq!(names.storage_account, "azureomniclouddevsa");
        assert_eq!(names.zone.as_str(), "example.com.");
        assert_eq!(names.primary_record.as_str(), "www.example.com.");
        assert_eq!(names.backup_record.as_str(), "backup.example.com.");
    }

    #[tokio::test]
    async fn test_build_chains_outputs_into_dns() {
        let engine = Arc::new(preview_engine());
        let mut stack = Stack::new("omnicloud", "dev", engine.clone());
        let deployment = build(&mut stack, &config()).unwrap();
        assert_eq!(deployment.azure.account_name, deployment.names.storage_account);

        let outputs = stack.finish().await.unwrap();
        assert_eq!(
            outputs.get_str(EXPORT_CLOUDFRONT_URL),
            Some("https://aws-omnicloud-dev-cdn.cloudfront.net")
        );
        assert_eq!(
            outputs.get_str(EXPORT_CLOUDFRONT_DOMAIN),
            Some("aws-omnicloud-dev-cdn.cloudfront.net")
        );
        assert_eq!(
            outputs.get_str(EXPORT_AZURE_PRIMARY_ENDPOINT),
            Some("https://azureomniclouddevsa.blob.core.windows.net/")
        );
        assert_eq!(
            outputs
                .get(EXPORT_GCP_NAME_SERVERS)
                .and_then(|v| v.as_array())
                .map(Vec::len),
            Some(4)
        );

        let resources = engine.resources().await;
        let record = |name: &str| {
            resources
                .get(omnicloud_cloud_gcp::infra::RECORD_SET, name)
                .unwrap()
                .args
                .clone()
        };
        assert_eq!(
            record("gcp-omnicloud-dev-www")["rrdatas"],
            json!(["aws-omnicloud-dev-cdn.cloudfront.net."])
        );
        assert_eq!(
            record("gcp-omnicloud-dev-backup")["rrdatas"],
            json!(["azureomniclouddevsa.blob.core.windows.net."])
        );

        // aws 5 + azure 5 + gcp 4
        assert_eq!(resources.len(), 14);
        assert_eq!(engine.plan().await.summary().create, 14);
        assert_eq!(
            engine
                .destroy_plan()
                .await
                .actions_by_type(ActionType::Retain)
                .len(),
            1
        );
    }

    #[test]
    fn test_custom_name_rules_reach_both_sides() {
        let rules = StorageAccountNameRules::new(3, 12).unwrap();
        let names = DeploymentNames::derive_with(&config(), &rules).unwrap();
        assert_eq!(names.storage_account, "azureomnicsa");

        let mut stack = Stack::new("omnicloud", "dev", Arc::new(preview_engine()));
        let args = AzureInfraArgs {
            name_rules: rules,
            ..azure_args(&config())
        };
        let deployment = build_with(&mut stack, &config(), args).unwrap();
        assert_eq!(deployment.names, names);
        assert_eq!(deployment.azure.account_name, names.storage_account);
    }

    #[tokio::test]
    async fn test_build_without_optional_resources() {
        let mut config = config();
        config.enable_azure_backup = false;
        config.enable_public_access_block = false;

        let engine = Arc::new(preview_engine());
        let mut stack = Stack::new("omnicloud", "dev", engine.clone());
        let deployment = build(&mut stack, &config).unwrap();
        assert!(deployment.aws.public_access_block.is_none());
        assert!(deployment.azure.blob_service_properties.is_none());

        stack.finish().await.unwrap();
        assert_eq!(engine.resources().await.len(), 12);
    }

    #[test]
    fn test_build_rejects_bad_retention() {
        let mut config = config();
        config.backup_retention_days = 1000;

        let mut stack = Stack::new("omnicloud", "dev", Arc::new(preview_engine()));
        assert!(matches!(
            build(&mut stack, &config),
            Err(CloudError::InvalidConfig(_))
        ));
    }
}
