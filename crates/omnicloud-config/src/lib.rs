pub mod error;
pub mod stack;
pub mod values;

pub use error::*;
pub use stack::{REQUIRED_KEYS, StackConfiguration};
pub use values::{CONFIG_NAMESPACE, ConfigValues, ENV_PREFIX};

use std::path::{Path, PathBuf};

/// Environment variable pointing directly at a stack file
pub const STACK_FILE_ENV: &str = "OMNICLOUD_STACK_FILE";

/// Stack used when none is given
pub const DEFAULT_STACK: &str = "dev";

/// File names tried for `stack`, in priority order
pub fn stack_file_candidates(stack: &str) -> [String; 2] {
    [
        format!("Omnicloud.{stack}.yaml"),
        format!("Pulumi.{stack}.yaml"),
    ]
}

/// Find the stack file for `stack`
///
/// Search order:
/// 1. `OMNICLOUD_STACK_FILE` (direct path)
/// 2. current directory: `Omnicloud.<stack>.yaml`, `Pulumi.<stack>.yaml`
/// 3. `./.omnicloud/` with the same names
/// 4. `~/.config/omnicloud/<stack>.yaml`
pub fn find_stack_file(stack: &str) -> Result<PathBuf> {
    if let Ok(path) = std::env::var(STACK_FILE_ENV) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::StackFileMissing(path));
    }

    let current_dir = std::env::current_dir()?;
    if let Some(path) = find_stack_file_in(&current_dir, stack) {
        return Ok(path);
    }

    if let Some(config_dir) = dirs::config_dir() {
        let global = config_dir.join("omnicloud").join(format!("{stack}.yaml"));
        if global.exists() {
            return Ok(global);
        }
    }

    Err(ConfigError::StackFileNotFound(stack.to_string()))
}

/// Look for the stack file in `dir` and `dir/.omnicloud/`
pub fn find_stack_file_in(dir: &Path, stack: &str) -> Option<PathBuf> {
    let candidates = stack_file_candidates(stack);

    for filename in &candidates {
        let path = dir.join(filename);
        if path.exists() {
            return Some(path);
        }
    }

    let omnicloud_dir = dir.join(".omnicloud");
    if omnicloud_dir.is_dir() {
        for filename in &candidates {
            let path = omnicloud_dir.join(filename);
            if path.exists() {
                return Some(path);
            }
        }
    }

    None
}

/// Load the configuration of `stack`
///
/// `path` short-circuits discovery. Values from the file are overridden by
/// `OMNICLOUD_<KEY>` environment variables.
pub fn load(stack: &str, path: Option<&Path>) -> Result<StackConfiguration> {
    let path = match path {
        Some(path) if path.exists() => path.to_path_buf(),
        Some(path) => return Err(ConfigError::StackFileMissing(path.to_path_buf())),
        None => find_stack_file(stack)?,
    };
    load_from_path(&path)
}

/// Load configuration from a specific stack file
pub fn load_from_path(path: impl AsRef<Path>) -> Result<StackConfiguration> {
    let path = path.as_ref();
    tracing::debug!("Loading stack configuration from {}", path.display());

    let values = ConfigValues::from_file(path)?.with_env_overrides(&REQUIRED_KEYS);
    StackConfiguration::from_values(&values)
}
