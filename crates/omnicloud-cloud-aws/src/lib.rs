//! AWS builder for omnicloud
//!
//! Declares the primary origin of the deployment: a private S3 bucket served
//! through CloudFront. The distribution hostname is exposed as an
//! [`Output`](omnicloud_cloud::Output) so the GCP builder can point the `www`
//! CNAME at it.
//!
//! # Example
//!
//! ```ignore
//! use omnicloud_cloud_aws::{AwsInfra, AwsInfraArgs};
//!
//! let aws = AwsInfra::new(&mut stack, "aws-omnicloud-dev", AwsInfraArgs::new("my-origin"))?;
//! stack.export_str("aws_cloudfront_url", &aws.cloudfront_url);
//! ```

pub mod infra;
pub mod preview;

pub use infra::{AwsInfra, AwsInfraArgs, COMPONENT_TYPE, S3_BLOCK_PUBLIC_ACCESS};
pub use preview::preview_outputs;

/// Provider prefix of every AWS type token
pub const PROVIDER: &str = "aws";
