use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required configuration key: {0}")]
    MissingConfiguration(String),

    #[error("Invalid value for configuration key {key}: {value:?} ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error(
        "Stack file not found for stack '{0}'. Looked for:\n\
        - current directory: Omnicloud.{0}.yaml, Pulumi.{0}.yaml\n\
        - ./.omnicloud/ directory\n\
        - ~/.config/omnicloud/{0}.yaml\n\
        Set OMNICLOUD_STACK_FILE to point at a file directly"
    )]
    StackFileNotFound(String),

    #[error("Stack file does not exist: {0}")]
    StackFileMissing(PathBuf),

    #[error("YAML parse error in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    pub(crate) fn invalid(
        key: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            key: key.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
