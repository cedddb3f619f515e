//! Preview outputs for AWS resources

use crate::infra::{BUCKET, DISTRIBUTION, ORIGIN_ACCESS_CONTROL};
use omnicloud_cloud::{ResourceConfig, ResourceOutputs};
use serde_json::json;

/// Region assumed for regional endpoints in previews
pub const PREVIEW_REGION: &str = "us-east-1";

/// Hosted zone id AWS uses for every CloudFront distribution
pub const CLOUDFRONT_HOSTED_ZONE_ID: &str = "Z2FDTNDATAQYW2";

/// Fill in what S3 and CloudFront would report after creation
pub fn preview_outputs(resource: &ResourceConfig, outputs: &mut ResourceOutputs) {
    match resource.resource_type.as_str() {
        BUCKET => {
            let bucket = resource
                .get_arg::<String>("bucket")
                .unwrap_or_else(|| resource.name.clone());
            outputs.insert("id".to_string(), json!(bucket));
            outputs.insert("arn".to_string(), json!(format!("arn:aws:s3:::{bucket}")));
            outputs.insert(
                "bucketRegionalDomainName".to_string(),
                json!(format!("{bucket}.s3.{PREVIEW_REGION}.amazonaws.com")),
            );
        }
        ORIGIN_ACCESS_CONTROL => {
            outputs.insert("id".to_string(), json!(format!("oac-{}", resource.name)));
        }
        DISTRIBUTION => {
            outputs.insert(
                "domainName".to_string(),
                json!(format!("{}.cloudfront.net", resource.name)),
            );
            outputs.insert("hostedZoneId".to_string(), json!(CLOUDFRONT_HOSTED_ZONE_ID));
        }
        _ => {}
    }
}
