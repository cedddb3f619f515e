//! Azure builder for omnicloud
//!
//! Declares the backup origin of the deployment: a Storage Account hosting a
//! static website, optionally with soft-delete so removed blobs and
//! containers stay recoverable for the configured retention period.
//!
//! Storage account names must be globally unique, lowercase alphanumeric
//! and 3-24 characters; the component name is sanitized accordingly.

pub mod infra;
pub mod preview;

pub use infra::{AzureInfra, AzureInfraArgs, COMPONENT_TYPE, blob_endpoint, storage_account_name};
pub use preview::preview_outputs;

/// Provider prefix of every Azure type token
pub const PROVIDER: &str = "azure-native";
