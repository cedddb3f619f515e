//! Naming helper error types

use thiserror::Error;

/// Errors raised by the naming helpers
///
/// Every variant reflects invalid static input. Callers propagate it as-is;
/// nothing here is worth retrying.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NamingError {
    #[error("Invalid argument {argument} = {value:?}: {reason}")]
    InvalidArgument {
        argument: &'static str,
        value: String,
        reason: String,
    },
}

impl NamingError {
    pub(crate) fn invalid(
        argument: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidArgument {
            argument,
            value: value.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, NamingError>;
