use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub(crate) const CONFIG_ENV: &str = "SPENDCAST_CONFIG";

/// Optional user defaults, read from `config.toml`.
///
/// Values are raw caller input; they go through the same validation as
/// command-line flags.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
    pub(crate) income: Option<f64>,
    pub(crate) forecast_months: Option<i64>,
    pub(crate) log_level: Option<String>,
}

impl Config {
    /// Load from `$SPENDCAST_CONFIG` or the platform config directory.
    /// A missing file yields the defaults.
    pub(crate) fn load() -> Result<Self> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub(crate) fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Income as a string for `ForecastParams::parse`.
    pub(crate) fn income_arg(&self) -> Option<String> {
        self.income.map(|v| v.to_string())
    }
}

fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }
    directories::ProjectDirs::from("com", "spendcast", "Spendcast")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
