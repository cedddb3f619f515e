//! Preview outputs for Cloud DNS

use crate::infra::MANAGED_ZONE;
use omnicloud_cloud::{ResourceConfig, ResourceOutputs};
use serde_json::json;

/// Name servers reported for every previewed zone
pub const PREVIEW_NAME_SERVERS: [&str; 4] = [
    "ns-cloud-a1.googledomains.com.",
    "ns-cloud-a2.googledomains.com.",
    "ns-cloud-a3.googledomains.com.",
    "ns-cloud-a4.googledomains.com.",
];

/// Fill in what Cloud DNS would report after creation
pub fn preview_outputs(resource: &ResourceConfig, outputs: &mut ResourceOutputs) {
    if resource.resource_type == MANAGED_ZONE {
        outputs.insert("nameServers".to_string(), json!(PREVIEW_NAME_SERVERS));
    }
}
