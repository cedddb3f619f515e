//! Cloud resource error types

use omnicloud_naming::NamingError;
use thiserror::Error;

/// Errors raised while declaring or resolving resources
///
/// `Clone` because a failure inside a deferred output is observed by every
/// consumer of that output.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CloudError {
    #[error("Naming error: {0}")]
    Naming(#[from] NamingError),

    #[error("Resource already exists: {0}")]
    ResourceAlreadyExists(String),

    #[error("Resource {resource} has no output '{output}'")]
    MissingOutput { resource: String, output: String },

    #[error("Output '{output}' of {resource} has an unexpected type: {reason}")]
    InvalidOutput {
        resource: String,
        output: String,
        reason: String,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Provisioning failed: {0}")]
    ProvisioningFailed(String),
}

pub type Result<T> = std::result::Result<T, CloudError>;
