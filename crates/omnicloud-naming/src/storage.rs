//! Storage account naming
//!
//! Azure storage account names are globally unique, lowercase alphanumeric
//! and 3-24 characters long. Other clouds use different bounds, so the limits
//! live in [`StorageAccountNameRules`] rather than in the sanitizer itself.

use crate::error::{NamingError, Result};

pub const STORAGE_ACCOUNT_NAME_MIN_LEN: usize = 3;
pub const STORAGE_ACCOUNT_NAME_MAX_LEN: usize = 24;

/// Length bounds for a sanitized storage account name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageAccountNameRules {
    pub min_len: usize,
    pub max_len: usize,
}

impl Default for StorageAccountNameRules {
    fn default() -> Self {
        Self::AZURE
    }
}

impl StorageAccountNameRules {
    pub const AZURE: Self = Self {
        min_len: STORAGE_ACCOUNT_NAME_MIN_LEN,
        max_len: STORAGE_ACCOUNT_NAME_MAX_LEN,
    };

    pub fn new(min_len: usize, max_len: usize) -> Result<Self> {
        if min_len == 0 || min_len > max_len {
            return Err(NamingError::invalid(
                "min_len",
                min_len.to_string(),
                format!("must be between 1 and max_len ({max_len})"),
            ));
        }
        Ok(Self { min_len, max_len })
    }

    /// Lowercase `raw`, drop everything but ASCII letters and digits, then
    /// truncate to `max_len`
    pub fn sanitize(&self, raw: &str) -> Result<String> {
        let name = clean(raw, self.max_len);
        self.check(raw, name)
    }

    /// Like [`sanitize`](Self::sanitize) but ends the name with `suffix`
    ///
    /// The body is truncated first so the suffix always survives.
    pub fn sanitize_with_suffix(&self, raw: &str, suffix: &str) -> Result<String> {
        if !suffix
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        {
            return Err(NamingError::invalid(
                "suffix",
                suffix,
                "must be lowercase alphanumeric",
            ));
        }
        if suffix.len() >= self.max_len {
            return Err(NamingError::invalid(
                "suffix",
                suffix,
                format!("leaves no room in {} characters", self.max_len),
            ));
        }

        let body = clean(raw, self.max_len - suffix.len());
        if body.is_empty() {
            return Err(no_alphanumerics(raw));
        }
        self.check(raw, body + suffix)
    }

    fn check(&self, raw: &str, name: String) -> Result<String> {
        if name.is_empty() {
            return Err(no_alphanumerics(raw));
        }
        if name.len() < self.min_len {
            return Err(NamingError::invalid(
                "raw",
                raw,
                format!(
                    "sanitized name {name:?} is shorter than {} characters",
                    self.min_len
                ),
            ));
        }
        Ok(name)
    }
}

/// Sanitize `raw` into an Azure storage account name
pub fn sanitize_storage_account_name(raw: &str) -> Result<String> {
    StorageAccountNameRules::AZURE.sanitize(raw)
}

fn clean(raw: &str, max_len: usize) -> String {
    raw.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .take(max_len)
        .collect()
}

fn no_alphanumerics(raw: &str) -> NamingError {
    NamingError::invalid("raw", raw, "contains no alphanumeric characters")
}
