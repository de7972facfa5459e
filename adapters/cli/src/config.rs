use std::{fs, path::Path};

use anyhow::{Context, Result};
use invader_wave_core::WaveConfig;

/// Loads the wave configuration from `path`, falling back to defaults when absent.
pub(crate) fn load(path: Option<&Path>) -> Result<WaveConfig> {
    let config = match path {
        Some(path) => {
            let contents = fs::read_to_string(path).with_context(|| {
                format!("failed to read wave configuration at {}", path.display())
            })?;
            parse(&contents)
                .with_context(|| format!("invalid wave configuration in {}", path.display()))?
        }
        None => WaveConfig::default(),
    };
    config.validate().context("wave configuration rejected")?;
    Ok(config)
}

fn parse(contents: &str) -> Result<WaveConfig> {
    toml::from_str(contents).context("failed to parse wave configuration toml")
}
