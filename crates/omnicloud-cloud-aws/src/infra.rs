//! S3 bucket + CloudFront distribution
//!
//! The bucket is never public. With Block Public Access on, the only way in
//! is CloudFront, which signs its origin requests through an Origin Access
//! Control. The distribution redirects to HTTPS and uses the default
//! CloudFront certificate.

use omnicloud_cloud::{
    CloudError, ComponentResource, Output, Resource, ResourceOptions, Result, Stack,
};
use serde_json::{Map, Value, json};

pub const COMPONENT_TYPE: &str = "omnicloud:aws:AwsInfra";

pub const BUCKET: &str = "aws:s3/bucket:Bucket";
pub const BUCKET_PUBLIC_ACCESS_BLOCK: &str =
    "aws:s3/bucketPublicAccessBlock:BucketPublicAccessBlock";
pub const ORIGIN_ACCESS_CONTROL: &str = "aws:cloudfront/originAccessControl:OriginAccessControl";
pub const DISTRIBUTION: &str = "aws:cloudfront/distribution:Distribution";

const S3_ORIGIN_ID: &str = "s3-origin";

/// Settings applied when Block Public Access is enabled
pub const S3_BLOCK_PUBLIC_ACCESS: [(&str, bool); 4] = [
    ("blockPublicAcls", true),
    ("blockPublicPolicy", true),
    ("ignorePublicAcls", true),
    ("restrictPublicBuckets", true),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwsInfraArgs {
    /// S3 bucket name; must be globally unique
    pub bucket_name: String,

    /// Apply [`S3_BLOCK_PUBLIC_ACCESS`] to the bucket
    pub enable_public_access_block: bool,
}

impl AwsInfraArgs {
    pub fn new(bucket_name: impl Into<String>) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            enable_public_access_block: true,
        }
    }
}

/// The AWS half of the deployment: origin bucket and CDN in front of it
#[derive(Debug, Clone)]
pub struct AwsInfra {
    pub component: ComponentResource,
    pub bucket: Resource,
    pub public_access_block: Option<Resource>,
    pub origin_access_control: Resource,
    pub distribution: Resource,

    /// Distribution hostname; the primary CNAME target
    pub cloudfront_domain_name: Output<String>,

    /// Route 53 zone id of the distribution, for alias records
    pub cloudfront_hosted_zone_id: Output<String>,

    /// `https://` URL of the distribution
    pub cloudfront_url: Output<String>,
}

impl AwsInfra {
    pub fn new(stack: &mut Stack, name: &str, args: AwsInfraArgs) -> Result<Self> {
        if args.bucket_name.trim().is_empty() {
            return Err(CloudError::InvalidConfig(
                "AWS bucket name must not be empty".to_string(),
            ));
        }

        let component = stack.component(COMPONENT_TYPE, name)?;
        let child = ResourceOptions::child_of(&component);

        let bucket = stack.declare(
            BUCKET,
            name,
            json!({ "bucket": &args.bucket_name }),
            child.clone(),
        )?;

        let public_access_block = if args.enable_public_access_block {
            let block_args = bucket.id().apply(|bucket_id| {
                let mut block = Map::new();
                block.insert("bucket".to_string(), Value::String(bucket_id));
                for (setting, enabled) in S3_BLOCK_PUBLIC_ACCESS {
                    block.insert(setting.to_string(), Value::Bool(enabled));
                }
                Value::Object(block)
            });
            Some(stack.declare(
                BUCKET_PUBLIC_ACCESS_BLOCK,
                &format!("{name}-block-public"),
                block_args,
                child.clone(),
            )?)
        } else {
            tracing::debug!("Block Public Access disabled for {}", args.bucket_name);
            None
        };

        // Retained on delete: CloudFront keeps referencing the OAC for a while
        // after the distribution is gone, and deleting it then fails with 409.
        let origin_access_control = stack.declare(
            ORIGIN_ACCESS_CONTROL,
            &format!("{name}-oac"),
            json!({
                "name": format!("{name}-oac"),
                "originAccessControlOriginType": "s3",
                "signingBehavior": "always",
                "signingProtocol": "sigv4",
            }),
            child.clone().retain_on_delete(true),
        )?;

        let distribution_args = bucket
            .output_str("bucketRegionalDomainName")
            .zip(&origin_access_control.id())
            .apply(|(origin_domain, oac_id)| distribution_args(&origin_domain, &oac_id));
        let distribution = stack.declare(
            DISTRIBUTION,
            &format!("{name}-cdn"),
            distribution_args,
            child.depends_on(&origin_access_control),
        )?;

        let cloudfront_domain_name = distribution.output_str("domainName");
        let cloudfront_hosted_zone_id = distribution.output_str("hostedZoneId");
        let cloudfront_url = cloudfront_domain_name.apply(|domain| format!("https://{domain}"));

        Ok(Self {
            component,
            bucket,
            public_access_block,
            origin_access_control,
            distribution,
            cloudfront_domain_name,
            cloudfront_hosted_zone_id,
            cloudfront_url,
        })
    }
}

fn distribution_args(origin_domain: &str, oac_id: &str) -> Value {
    json!({
        "enabled": true,
        "origins": [{
            "domainName": origin_domain,
            "originId": S3_ORIGIN_ID,
            "originAccessControlId": oac_id,
        }],
        "defaultCacheBehavior": {
            "targetOriginId": S3_ORIGIN_ID,
            "viewerProtocolPolicy": "redirect-to-https",
            "allowedMethods": ["GET", "HEAD", "OPTIONS"],
            "cachedMethods": ["GET", "HEAD"],
            "compress": true,
            "forwardedValues": {
                "queryString": false,
                "cookies": { "forward": "none" },
            },
        },
        "restrictions": {
            "geoRestriction": { "restrictionType": "none" },
        },
        "viewerCertificate": {
            "cloudfrontDefaultCertificate": true,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::{CLOUDFRONT_HOSTED_ZONE_ID, preview_outputs};
    use omnicloud_cloud::{ActionType, PreviewEngine};
    use std::sync::Arc;

    fn stack() -> (Arc<PreviewEngine>, Stack) {
        let engine = Arc::new(PreviewEngine::new().with_provider("aws", preview_outputs));
        let stack = Stack::new("omnicloud", "test", engine.clone());
        (engine, stack)
    }

    #[tokio::test]
    async fn test_aws_infra_topology() {
        let (engine, mut stack) = stack();
        let aws = AwsInfra::new(&mut stack, "aws-demo-dev", AwsInfraArgs::new("demo-origin")).unwrap();
        let url = aws.cloudfront_url.clone();
        let zone_id = aws.cloudfront_hosted_zone_id.clone();

        stack.finish().await.unwrap();

        assert_eq!(
            url.resolve().await.unwrap(),
            "https://aws-demo-dev-cdn.cloudfront.net"
        );
        assert_eq!(zone_id.resolve().await.unwrap(), CLOUDFRONT_HOSTED_ZONE_ID);

        let resources = engine.resources().await;
        assert_eq!(resources.len(), 5);

        let block = resources
            .get(BUCKET_PUBLIC_ACCESS_BLOCK, "aws-demo-dev-block-public")
            .unwrap();
        assert_eq!(block.get_arg::<String>("bucket").as_deref(), Some("demo-origin"));
        for (setting, _) in S3_BLOCK_PUBLIC_ACCESS {
            assert_eq!(block.get_arg::<bool>(setting), Some(true));
        }

        let cdn = resources.get(DISTRIBUTION, "aws-demo-dev-cdn").unwrap();
        assert_eq!(cdn.parent.as_deref(), Some("omnicloud:aws:AwsInfra::aws-demo-dev"));
        assert_eq!(cdn.depends_on, vec![format!("{ORIGIN_ACCESS_CONTROL}::aws-demo-dev-oac")]);
        assert_eq!(
            cdn.args["origins"][0]["domainName"],
            json!("demo-origin.s3.us-east-1.amazonaws.com")
        );
        assert_eq!(
            cdn.args["defaultCacheBehavior"]["viewerProtocolPolicy"],
            json!("redirect-to-https")
        );
    }

    #[tokio::test]
    async fn test_public_access_block_optional() {
        let (engine, mut stack) = stack();
        let args = AwsInfraArgs {
            bucket_name: "demo-origin".to_string(),
            enable_public_access_block: false,
        };
        let aws = AwsInfra::new(&mut stack, "aws-demo-dev", args).unwrap();
        assert!(aws.public_access_block.is_none());

        stack.finish().await.unwrap();
        let resources = engine.resources().await;
        assert_eq!(resources.len(), 4);
        assert!(resources.by_type(BUCKET_PUBLIC_ACCESS_BLOCK).is_empty());
    }

    #[tokio::test]
    async fn test_oac_is_retained_on_destroy() {
        let (engine, mut stack) = stack();
        AwsInfra::new(&mut stack, "aws-demo-dev", AwsInfraArgs::new("demo-origin")).unwrap();
        stack.finish().await.unwrap();

        let plan = engine.destroy_plan().await;
        let retained = plan.actions_by_type(ActionType::Retain);
        assert_eq!(retained.len(), 1);
        assert_eq!(retained[0].resource_type, ORIGIN_ACCESS_CONTROL);
    }

    #[test]
    fn test_empty_bucket_name() {
        let (_engine, mut stack) = stack();
        let result = AwsInfra::new(&mut stack, "aws-demo-dev", AwsInfraArgs::new(" "));
        assert!(matches!(result, Err(CloudError::InvalidConfig(_))));
    }
}
