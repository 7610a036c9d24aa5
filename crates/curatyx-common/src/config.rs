//! Configuration loading for Curatyx.
//! Reads curatyx.toml from the current directory or path in CURATYX_CONFIG env var.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub curation: CurationConfig,
    #[serde(default)]
    pub reference: ReferenceConfig,
}

/// How the alias expander treats one alias listed under several canonical ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AliasCollision {
    /// Keep the canonical id of the first row (in reference order) listing the alias.
    #[default]
    FirstSeenWins,
    /// Keep the canonical id of the last row listing the alias.
    LastSeenWins,
    /// Fail with `AmbiguousAlias`.
    Reject,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurationConfig {
    #[serde(default = "default_compliance_column")]
    pub compliance_column: String,
    #[serde(default = "default_orig_index_column")]
    pub orig_index_column: String,
    #[serde(default)]
    pub alias_collision: AliasCollision,
    /// Separator for aliases packed into a single text cell, e.g. "K-RAS|KRAS2".
    #[serde(default = "default_list_delimiter")]
    pub list_delimiter: String,
}

fn default_compliance_column() -> String { "curated".to_string() }
fn default_orig_index_column() -> String { "orig_index".to_string() }
fn default_list_delimiter()    -> String { "|".to_string() }

impl Default for CurationConfig {
    fn default() -> Self {
        Self {
            compliance_column: default_compliance_column(),
            orig_index_column: default_orig_index_column(),
            alias_collision: AliasCollision::default(),
            list_delimiter: default_list_delimiter(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceConfig {
    /// Root of the local reference table store.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_species")]
    pub species: String,
}

fn default_data_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("curatyx")
        .join("reference")
}

fn default_species() -> String { "human".to_string() }

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self { data_dir: default_data_dir(), species: default_species() }
    }
}

impl Config {
    fn config_path() -> String {
        std::env::var("CURATYX_CONFIG").unwrap_or_else(|_| "curatyx.toml".to_string())
    }

    /// Load config from CURATYX_CONFIG or ./curatyx.toml.
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path();

        if !Path::new(&path).exists() {
            anyhow::bail!(
                "Config file not found: {}\n\
                 Set CURATYX_CONFIG or create curatyx.toml.",
                path
            );
        }

        Self::from_file(Path::new(&path))
    }

    /// Like [`Config::load`], but an absent file yields the defaults.
    pub fn load_or_default() -> anyhow::Result<Self> {
        let path = Self::config_path();
        if Path::new(&path).exists() {
            Self::from_file(Path::new(&path))
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
