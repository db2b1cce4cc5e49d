//! CLI command handling

pub mod handlers;
pub mod registry;

use anyhow::{Context, Result};
use groupcast_core::models::Configuration;
use std::path::PathBuf;

pub const DEFAULT_CONFIG_ARG: &str = "~/.config/groupcast/config.toml";

pub fn resolve_config_path(config_arg: &str) -> Result<PathBuf> {
    if config_arg == DEFAULT_CONFIG_ARG {
        return Configuration::default_config_path().context("Failed to get default config path");
    }
    if let Some(rest) = config_arg.strip_prefix("~/") {
        let home = std::env::var("HOME").context("HOME environment variable not set")?;
        return Ok(PathBuf::from(home).join(rest));
    }
    Ok(PathBuf::from(config_arg))
}

pub fn load_config(config_arg: &str) -> Result<Configuration> {
    let path = resolve_config_path(config_arg)?;
    Configuration::load_from_file(&path)
        .with_context(|| format!("Failed to load config {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_path_is_kept() {
        assert_eq!(
            resolve_config_path("/etc/groupcast.toml").unwrap(),
            PathBuf::from("/etc/groupcast.toml")
        );
    }

    #[test]
    fn test_load_missing_config_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("none.toml");
        let config = load_config(path.to_str().unwrap()).unwrap();
        assert!(config.operator_id.is_none());
    }
}
