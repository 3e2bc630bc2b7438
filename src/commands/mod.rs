pub mod check;
pub mod init;
pub mod profiles;
pub mod select;

use crate::config::{load_config, load_config_from_path, PolicyGateConfig};
use anyhow::Result;
use std::path::Path;

/// Explicit `--config` file, else the nearest `policygate.toml`, else defaults.
pub fn resolve_config(path: Option<&Path>) -> Result<PolicyGateConfig> {
    let config = match path {
        Some(path) => load_config_from_path(path)?,
        None => load_config()?,
    };
    Ok(config)
}
