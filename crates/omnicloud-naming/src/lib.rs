//! omnicloud naming helpers
//!
//! Pure, synchronous string transforms used while assembling cloud resource
//! arguments: FQDNs and CNAME record data for Cloud DNS, storage account names
//! for Azure, and the shared `{prefix}-{project}-{environment}` component names.
//!
//! Nothing here touches the network, the filesystem or shared state, so every
//! function can be called from any thread at any time.
//!
//! ```
//! use omnicloud_naming::{cname_rrdata, fqdn, sanitize_storage_account_name};
//!
//! assert_eq!(fqdn("www", "example.com").unwrap(), "www.example.com.");
//! assert_eq!(cname_rrdata("d123.cloudfront.net").unwrap(), "d123.cloudfront.net.");
//! assert_eq!(sanitize_storage_account_name("My-Project_01").unwrap(), "myproject01");
//! ```

pub mod component;
pub mod dns;
pub mod error;
pub mod storage;

// Re-exports
pub use component::component_name;
pub use dns::{CnameRecord, DomainName, cname_rrdata, endpoint_host, ensure_trailing_dot, fqdn};
pub use error::{NamingError, Result};
pub use storage::{
    STORAGE_ACCOUNT_NAME_MAX_LEN, STORAGE_ACCOUNT_NAME_MIN_LEN, StorageAccountNameRules,
    sanitize_storage_account_name,
};
