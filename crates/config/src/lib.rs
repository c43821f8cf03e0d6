#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for driftwatch
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/driftwatch/config.toml)
//! - Environment variables
//! - CLI flags

use driftwatch_errors::{ConfigError, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Plain,
    #[default]
    Tty,
    Json,
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    Always,
    #[default]
    Auto,
    Never,
}

impl clap::ValueEnum for ColorChoice {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Always, Self::Auto, Self::Never]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(match self {
            Self::Always => clap::builder::PossibleValue::new("always"),
            Self::Auto => clap::builder::PossibleValue::new("auto"),
            Self::Never => clap::builder::PossibleValue::new("never"),
        })
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub scan: ScanConfig,

    #[serde(default)]
    pub paths: PathConfig,

    #[serde(default)]
    pub fetch: FetchConfig,
}

/// General configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GeneralConfig {
    #[serde(default)]
    pub default_output: OutputFormat,
    #[serde(default)]
    pub color: ColorChoice,
}

/// Scan configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Library directory names to track under the scan roots
    #[serde(default)]
    pub libraries: Vec<String>,
    /// File extensions included in snapshots
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

/// Path configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PathConfig {
    pub trusted_dir: Option<PathBuf>,
    pub check_dir: Option<PathBuf>,
    pub freeze_file: Option<PathBuf>,
}

/// Fetch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// External installer invoked to populate the trusted directory
    #[serde(default = "default_fetch_tool")]
    pub tool: String,
    /// Alternate package index passed through to the installer
    pub index_url: Option<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            libraries: Vec::new(),
            extensions: default_extensions(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            tool: default_fetch_tool(),
            index_url: None,
        }
    }
}

// Default value functions for serde

fn default_extensions() -> Vec<String> {
    vec!["py".to_string()]
}

fn default_fetch_tool() -> String {
    "pip".to_string()
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir.join("driftwatch").join("config.toml"))
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the file contents
    /// contain invalid TOML syntax that cannot be parsed.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;

        toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError {
                message: e.to_string(),
            })
            .map_err(Into::into)
    }

    /// Load configuration with fallback to defaults
    ///
    /// A missing config file, or a platform with no resolvable config
    /// directory, yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub async fn load() -> Result<Self, Error> {
        let Ok(config_path) = Self::default_path() else {
            return Ok(Self::default());
        };

        if config_path.exists() {
            Self::load_from_file(&config_path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// If path is provided, loads from that file.
    /// If path is None, uses the default loading behavior.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: &Option<PathBuf>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        // DRIFTWATCH_OUTPUT
        if let Ok(output) = std::env::var("DRIFTWATCH_OUTPUT") {
            self.general.default_output = match output.as_str() {
                "plain" => OutputFormat::Plain,
                "tty" => OutputFormat::Tty,
                "json" => OutputFormat::Json,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "DRIFTWATCH_OUTPUT".to_string(),
                        message: format!("unrecognized output format: {output}"),
                    }
                    .into())
                }
            };
        }

        // DRIFTWATCH_COLOR
        if let Ok(color) = std::env::var("DRIFTWATCH_COLOR") {
            self.general.color = match color.as_str() {
                "always" => ColorChoice::Always,
                "auto" => ColorChoice::Auto,
                "never" => ColorChoice::Never,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "DRIFTWATCH_COLOR".to_string(),
                        message: format!("unrecognized color choice: {color}"),
                    }
                    .into())
                }
            };
        }

        // DRIFTWATCH_TRUSTED_DIR
        if let Ok(dir) = std::env::var("DRIFTWATCH_TRUSTED_DIR") {
            self.paths.trusted_dir = Some(PathBuf::from(dir));
        }

        // DRIFTWATCH_CHECK_DIR
        if let Ok(dir) = std::env::var("DRIFTWATCH_CHECK_DIR") {
            self.paths.check_dir = Some(PathBuf::from(dir));
        }

        // DRIFTWATCH_FREEZE_FILE
        if let Ok(file) = std::env::var("DRIFTWATCH_FREEZE_FILE") {
            self.paths.freeze_file = Some(PathBuf::from(file));
        }

        // DRIFTWATCH_FETCH_TOOL
        if let Ok(tool) = std::env::var("DRIFTWATCH_FETCH_TOOL") {
            self.fetch.tool = tool;
        }

        // DRIFTWATCH_INDEX_URL
        if let Ok(url) = std::env::var("DRIFTWATCH_INDEX_URL") {
            self.fetch.index_url = Some(url);
        }

        Ok(())
    }

    /// Get the trusted directory (with default)
    #[must_use]
    pub fn trusted_dir(&self) -> PathBuf {
        self.paths
            .trusted_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("./trusted-libs"))
    }

    /// Get the freeze file path (with default)
    #[must_use]
    pub fn freeze_file(&self) -> PathBuf {
        self.paths
            .freeze_file
            .clone()
            .unwrap_or_else(|| PathBuf::from("driftwatch-freeze.json"))
    }

    /// Get the explicitly configured check directory, if any
    #[must_use]
    pub fn check_dir(&self) -> Option<PathBuf> {
        self.paths.check_dir.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.general.color, ColorChoice::Auto);
        assert_eq!(config.general.default_output, OutputFormat::Tty);
        assert!(config.scan.libraries.is_empty());
        assert_eq!(config.scan.extensions, vec!["py".to_string()]);
        assert_eq!(config.fetch.tool, "pip");
        assert_eq!(config.freeze_file(), PathBuf::from("driftwatch-freeze.json"));
        assert_eq!(config.trusted_dir(), PathBuf::from("./trusted-libs"));
        assert!(config.check_dir().is_none());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [scan]
            libraries = ["requests", "urllib3"]

            [paths]
            freeze_file = "/tmp/freeze.json"
            "#,
        )
        .unwrap();

        assert_eq!(config.scan.libraries, vec!["requests", "urllib3"]);
        assert_eq!(config.scan.extensions, vec!["py".to_string()]);
        assert_eq!(config.freeze_file(), PathBuf::from("/tmp/freeze.json"));
        assert_eq!(config.fetch.tool, "pip");
    }

    #[tokio::test]
    async fn test_load_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-such-config.toml");
        let err = Config::load_from_file(&missing).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_load_invalid_toml_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "not = [valid").unwrap();
        let err = Config::load_from_file(&path).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::ParseError { .. })
        ));
    }
}
