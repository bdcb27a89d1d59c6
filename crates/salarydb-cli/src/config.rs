//! Configuration file support for the CLI.
//!
//! Loads CLI configuration from TOML files.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::formatter::OutputFormat;

/// When to load the data file into the store at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImportMode {
    /// Append the whole file on every start.
    Always,
    /// Import only when the table holds no rows.
    #[default]
    IfEmpty,
    /// Never import; use whatever the store already holds.
    Never,
}

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Delimited file imported at startup.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// Field delimiter of the data file.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// Startup import policy.
    #[serde(default)]
    pub import_mode: ImportMode,

    /// Default output format.
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Maximum display width of text columns in table output.
    #[serde(default = "default_column_width")]
    pub column_width: usize,

    /// History file path.
    #[serde(default)]
    pub history_file: Option<PathBuf>,

    /// Maximum history size.
    #[serde(default = "default_history_size")]
    pub history_size: usize,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("sql.db")
}

fn default_data_file() -> PathBuf {
    PathBuf::from("salary_data.csv")
}

fn default_delimiter() -> char {
    ','
}

fn default_column_width() -> usize {
    20
}

fn default_history_size() -> usize {
    1000
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            data_file: default_data_file(),
            delimiter: default_delimiter(),
            import_mode: ImportMode::default(),
            output_format: OutputFormat::default(),
            column_width: default_column_width(),
            history_file: None,
            history_size: default_history_size(),
        }
    }
}

impl CliConfig {
    /// Loads configuration from a file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Loads the default configuration file.
    ///
    /// Looks in the following locations:
    /// 1. ~/.config/salarydb/config.toml
    /// 2. ~/.salarydb/config.toml
    /// 3. Returns default if not found
    pub fn load_default() -> Result<Self> {
        if let Some(path) = Self::default_config_path() {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        if let Some(home) = dirs::home_dir() {
            let path = home.join(".salarydb").join("config.toml");
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Returns the default configuration file path.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("salarydb").join("config.toml"))
    }

    /// Returns the history file, falling back to the platform data directory.
    pub fn history_path(&self) -> Option<PathBuf> {
        self.history_file
            .clone()
            .or_else(|| dirs::data_local_dir().map(|dir| dir.join("salarydb").join("history")))
    }

    /// Returns the delimiter as the single byte the importer expects.
    pub fn delimiter_byte(&self) -> Result<u8> {
        if !self.delimiter.is_ascii() {
            bail!("delimiter {:?} is not a single ASCII character", self.delimiter);
        }
        Ok(self.delimiter as u8)
    }
}
