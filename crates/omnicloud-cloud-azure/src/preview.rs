//! Preview outputs for Azure resources

use crate::infra::{STORAGE_ACCOUNT, blob_endpoint};
use omnicloud_cloud::{ResourceConfig, ResourceOutputs};
use serde_json::json;

/// Fill in what Azure Resource Manager would report after creation
pub fn preview_outputs(resource: &ResourceConfig, outputs: &mut ResourceOutputs) {
    if resource.resource_type != STORAGE_ACCOUNT {
        return;
    }
    let Some(account) = resource.get_arg::<String>("accountName") else {
        return;
    };
    outputs.insert(
        "primaryEndpoints".to_string(),
        json!({
            "blob": blob_endpoint(&account),
            "web": format!("https://{account}.z13.web.core.windows.net/"),
        }),
    );
}
