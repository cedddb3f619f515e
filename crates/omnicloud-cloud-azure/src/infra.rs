//! Storage Account static website with optional soft-delete
//!
//! A resource group, a StorageV2 account serving `index.html`/`404.html`, and
//! when backup is on, blob and container delete retention. The account's
//! primary endpoint is the backup origin behind the `backup` CNAME.

use omnicloud_cloud::{
    CloudError, ComponentResource, Output, Resource, ResourceOptions, Result, Stack,
};
use omnicloud_naming::{StorageAccountNameRules, endpoint_host};
use serde_json::json;

pub const COMPONENT_TYPE: &str = "omnicloud:azure:AzureInfra";

pub const RESOURCE_GROUP: &str = "azure-native:resources:ResourceGroup";
pub const STORAGE_ACCOUNT: &str = "azure-native:storage:StorageAccount";
pub const STATIC_WEBSITE: &str = "azure-native:storage:StorageAccountStaticWebsite";
pub const BLOB_SERVICE_PROPERTIES: &str = "azure-native:storage:BlobServiceProperties";

/// Appended to the sanitized component name to form the account name
pub const STORAGE_ACCOUNT_SUFFIX: &str = "sa";

/// Longest soft-delete retention Azure accepts
pub const MAX_RETENTION_DAYS: u32 = 365;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AzureInfraArgs {
    /// Turn on blob and container soft-delete
    pub enable_backup: bool,

    /// Retention in days while `enable_backup` is set
    pub backup_retention_days: u32,

    /// Length bounds for the storage account name
    pub name_rules: StorageAccountNameRules,
}

impl Default for AzureInfraArgs {
    fn default() -> Self {
        Self {
            enable_backup: false,
            backup_retention_days: 30,
            name_rules: StorageAccountNameRules::AZURE,
        }
    }
}

/// The Azure half of the deployment: static website storage
#[derive(Debug, Clone)]
pub struct AzureInfra {
    pub component: ComponentResource,
    pub resource_group: Resource,
    pub storage_account: Resource,
    pub static_website: Resource,
    pub blob_service_properties: Option<Resource>,

    /// Sanitized storage account name, known up front
    pub account_name: String,

    /// `https://<account>.blob.core.windows.net/`
    pub primary_endpoint: Output<String>,

    /// Host part of `primary_endpoint`; the backup CNAME target
    pub primary_host: Output<String>,
}

impl AzureInfra {
    pub fn new(stack: &mut Stack, name: &str, args: AzureInfraArgs) -> Result<Self> {
        if args.enable_backup && !(1..=MAX_RETENTION_DAYS).contains(&args.backup_retention_days) {
            return Err(CloudError::InvalidConfig(format!(
                "backup retention must be between 1 and {MAX_RETENTION_DAYS} days, got {}",
                args.backup_retention_days
            )));
        }

        let account_name = storage_account_name(&args.name_rules, name)?;
        tracing::debug!("Storage account for {}: {}", name, account_name);

        let component = stack.component(COMPONENT_TYPE, name)?;
        let child = ResourceOptions::child_of(&component);

        let group_name = format!("{name}-rg");
        let resource_group = stack.declare(
            RESOURCE_GROUP,
            &group_name,
            json!({ "resourceGroupName": &group_name }),
            child.clone(),
        )?;
        let group = resource_group.output_str("resourceGroupName");

        let account_args = {
            let account_name = account_name.clone();
            group.apply(move |group| {
                json!({
                    "resourceGroupName": group,
                    "accountName": account_name,
                    "sku": { "name": "Standard_LRS" },
                    "kind": "StorageV2",
                    "enableHttpsTrafficOnly": true,
                    "minimumTlsVersion": "TLS1_2",
                    "allowBlobPublicAccess": false,
                })
            })
        };
        let storage_account = stack.declare(
            STORAGE_ACCOUNT,
            &format!("{name}{STORAGE_ACCOUNT_SUFFIX}"),
            account_args,
            child.clone(),
        )?;
        let account = storage_account.output_str("accountName");
        let account_in_group = account.zip(&group);

        let static_website = stack.declare(
            STATIC_WEBSITE,
            &format!("{name}-static"),
            account_in_group.apply(|(account, group)| {
                json!({
                    "accountName": account,
                    "resourceGroupName": group,
                    "indexDocument": "index.html",
                    "error404Document": "404.html",
                })
            }),
            child.clone(),
        )?;

        let blob_service_properties = if args.enable_backup {
            let days = args.backup_retention_days;
            let properties = account_in_group.apply(move |(account, group)| {
                let retention = json!({ "enabled": true, "days": days });
                json!({
                    "accountName": account,
                    "resourceGroupName": group,
                    "blobServicesName": "default",
                    "deleteRetentionPolicy": retention,
                    "containerDeleteRetentionPolicy": retention,
                })
            });
            Some(stack.declare(
                BLOB_SERVICE_PROPERTIES,
                &format!("{name}-backup"),
                properties,
                child,
            )?)
        } else {
            None
        };

        let primary_endpoint = account.apply(|account| blob_endpoint(&account));
        let primary_host = primary_endpoint.try_apply(|endpoint| endpoint_host(&endpoint));

        Ok(Self {
            component,
            resource_group,
            storage_account,
            static_website,
            blob_service_properties,
            account_name,
            primary_endpoint,
            primary_host,
        })
    }
}

/// Storage account name `AzureInfra::new` gives the component `name`
pub fn storage_account_name(
    rules: &StorageAccountNameRules,
    name: &str,
) -> omnicloud_naming::Result<String> {
    rules.sanitize_with_suffix(name, STORAGE_ACCOUNT_SUFFIX)
}

/// Blob endpoint of `account`
pub fn blob_endpoint(account: &str) -> String {
    format!("https://{account}.blob.core.windows.net/")
}
