//! Configuration: which accounts to read and where their statements live
//!
//! Loaded from TOML. Lookup order is an explicit `--config` path, then
//! `<config home>/isa-perf/config.toml`, then built-in defaults reading
//! `statements/moneyfarm` and `statements/interactive-investor` relative to
//! the working directory.
//!
//! ```toml
//! [[accounts]]
//! name = "Moneyfarm ISA"
//! provider = "moneyfarm"
//! directory = "statements/moneyfarm"
//!
//! [chart]
//! width = 40
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::StatementError;
use crate::importers::Provider;

pub const DEFAULT_CHART_WIDTH: usize = 40;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_accounts")]
    pub accounts: Vec<AccountConfig>,

    #[serde(default)]
    pub chart: ChartConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Display name; defaults to the provider's name
    pub name: Option<String>,
    pub provider: Provider,
    pub directory: PathBuf,
}

impl AccountConfig {
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .unwrap_or_else(|| self.provider.account_name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Width in cells of the longest bar
    #[serde(default = "default_chart_width")]
    pub width: usize,

    /// Where to write chart series as JSON, if anywhere
    #[serde(default)]
    pub data_path: Option<PathBuf>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_CHART_WIDTH,
            data_path: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            accounts: default_accounts(),
            chart: ChartConfig::default(),
        }
    }
}

fn default_accounts() -> Vec<AccountConfig> {
    vec![
        AccountConfig {
            name: None,
            provider: Provider::Moneyfarm,
            directory: PathBuf::from("statements/moneyfarm"),
        },
        AccountConfig {
            name: None,
            provider: Provider::InteractiveInvestor,
            directory: PathBuf::from("statements/interactive-investor"),
        },
    ]
}

fn default_chart_width() -> usize {
    DEFAULT_CHART_WIDTH
}

impl Config {
    pub fn account(&self, name: &str) -> Option<&AccountConfig> {
        self.accounts
            .iter()
            .find(|a| a.display_name().eq_ignore_ascii_case(name))
    }

    fn validate(&self) -> Result<()> {
        if self.accounts.is_empty() {
            return Err(StatementError::ConfigError("no accounts configured".to_string()).into());
        }

        let mut names = HashSet::new();
        for account in &self.accounts {
            if !names.insert(account.display_name().to_lowercase()) {
                return Err(StatementError::ConfigError(format!(
                    "duplicate account name '{}'",
                    account.display_name()
                ))
                .into());
            }
        }

        if self.chart.width == 0 {
            return Err(
                StatementError::ConfigError("chart width must be at least 1".to_string()).into(),
            );
        }
        Ok(())
    }
}

/// Default config file location (`<config home>/isa-perf/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dir_spec::config_home().map(|dir| dir.join("isa-perf").join("config.toml"))
}

/// Parse and validate config TOML
pub fn parse_config(text: &str) -> Result<Config> {
    let config: Config =
        toml::from_str(text).map_err(|e| StatementError::ConfigError(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

/// Load config from `explicit`, the default location, or built-in defaults
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => match default_config_path().filter(|p| p.is_file()) {
            Some(p) => p,
            None => {
                debug!("No config file found, using built-in accounts");
                return Ok(Config::default());
            }
        },
    };

    info!("Loading config from {:?}", path);
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file {:?}", path))?;
    parse_config(&text).with_context(|| format!("Invalid config file {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_matches_builtin_accounts() {
        let config = Config::default();
        assert_eq!(config.accounts.len(), 2);
        assert_eq!(config.accounts[0].display_name(), "Moneyfarm");
        assert_eq!(config.accounts[1].display_name(), "Interactive Investor");
        assert_eq!(config.chart.width, DEFAULT_CHART_WIDTH);
    }

    #[test]
    fn test_parse_config_with_names_and_chart() {
        let config = parse_config(
            r#"
            [[accounts]]
            name = "MF ISA"
            provider = "moneyfarm"
            directory = "/data/mf"

            [[accounts]]
            provider = "interactive_investor"
            directory = "/data/ii"

            [chart]
            width = 20
            data_path = "chart.json"
            "#,
        )
        .unwrap();

        assert_eq!(config.accounts[0].display_name(), "MF ISA");
        assert_eq!(config.accounts[1].display_name(), "Interactive Investor");
        assert_eq!(config.accounts[1].directory, PathBuf::from("/data/ii"));
        assert_eq!(config.chart.width, 20);
        assert_eq!(config.chart.data_path, Some(PathBuf::from("chart.json")));
        assert!(config.account("mf isa").is_some());
    }

    #[test]
    fn test_missing_accounts_section_uses_defaults() {
        let config = parse_config("[chart]\nwidth = 10\n").unwrap();
        assert_eq!(config.accounts, default_accounts());
        assert_eq!(config.chart.width, 10);
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let err = parse_config(
            "[[accounts]]\nprovider = \"vanguard\"\ndirectory = \"x\"\n",
        )
        .unwrap_err();
        assert!(err.to_string().starts_with("config error"));
    }

    #[test]
    fn test_duplicate_and_empty_accounts_rejected() {
        let dup = "[[accounts]]\nprovider = \"moneyfarm\"\ndirectory = \"a\"\n\
                   [[accounts]]\nprovider = \"moneyfarm\"\ndirectory = \"b\"\n";
        assert!(parse_config(dup)
            .unwrap_err()
            .to_string()
            .contains("duplicate account name"));

        assert!(parse_config("accounts = []\n").is_err());
    }

    #[test]
    fn test_load_config_explicit_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[[accounts]]\nprovider = \"moneyfarm\"\ndirectory = \"mf\"\n",
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.accounts.len(), 1);

        assert!(load_config(Some(&dir.path().join("missing.toml"))).is_err());
    }
}
