//! GCP builder for omnicloud
//!
//! Declares the Cloud DNS side of the failover setup. Targets may be known
//! strings or outputs of other clouds' resources:
//!
//! ```
//! use omnicloud_cloud::{PreviewEngine, Stack};
//! use omnicloud_cloud_gcp::{GcpInfra, GcpInfraArgs};
//! use std::sync::Arc;
//!
//! let mut stack = Stack::new("omnicloud", "dev", Arc::new(PreviewEngine::new()));
//! let args = GcpInfraArgs::new("example.com", "lb.example.net");
//! let gcp = GcpInfra::new(&mut stack, "gcp-demo-dev", args).unwrap();
//! assert_eq!(gcp.dns_name.as_str(), "example.com.");
//! ```

pub mod infra;
pub mod preview;

pub use infra::{
    BACKUP_LABEL, COMPONENT_TYPE, DEFAULT_BACKUP_TTL, DEFAULT_PRIMARY_TTL, GcpInfra, GcpInfraArgs,
    PRIMARY_LABEL,
};
pub use preview::preview_outputs;

/// Provider prefix of every GCP type token
pub const PROVIDER: &str = "gcp";
