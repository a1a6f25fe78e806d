//! Configuration file loading

use anyhow::{Context, Result};
use std::path::Path;
use taskbridge_core::BridgeConfig;

/// Load the bridge configuration, or defaults when no file is given
///
/// Files ending in `.json` are parsed as JSON, anything else as TOML.
pub fn load(path: Option<&Path>) -> Result<BridgeConfig> {
    let Some(path) = path else {
        return Ok(BridgeConfig::default());
    };

    let content = std::fs::read(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let config = if is_json {
        BridgeConfig::from_json(&content)
    } else {
        let text = std::str::from_utf8(&content)
            .with_context(|| format!("Config is not UTF-8: {}", path.display()))?;
        BridgeConfig::from_toml(text)
    };

    config.with_context(|| format!("Invalid config: {}", path.display()))
}
