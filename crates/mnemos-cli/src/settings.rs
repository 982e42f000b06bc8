//! Configuration file
//!
//! `--config FILE` wins; otherwise `config.toml` in the platform config
//! directory is used when it exists. Missing keys take their defaults.

use std::path::{Path, PathBuf};

use anyhow::Context;
use directories::ProjectDirs;
use mnemos_core::SrsConfig;

pub const CONFIG_FILE: &str = "config.toml";

/// Platform location of the implicit config file.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "mnemos", "core").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

pub fn parse_config(toml_text: &str) -> anyhow::Result<SrsConfig> {
    let config: SrsConfig = toml::from_str(toml_text).context("Invalid scheduler configuration")?;
    Ok(config.sanitized())
}

/// Effective configuration and the file it came from, if any.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<(SrsConfig, Option<PathBuf>)> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path().filter(|p| p.exists()),
    };

    let Some(path) = path else {
        return Ok((SrsConfig::default(), None));
    };

    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config = parse_config(&text).with_context(|| format!("In {}", path.display()))?;
    tracing::debug!("Loaded configuration from {}", path.display());
    Ok((config, Some(path)))
}
