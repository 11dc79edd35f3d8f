//! Feed configuration loading.
//!
//! Configuration is a JSON document naming a working directory and a list
//! of feed definitions. Each feed declares its ordered input fields (one
//! marked as the unique key, at most one marked as a bounded FOR field),
//! the ordered output column names, the rows file to read, and the CSV
//! file to write.
//!
//! ```json
//! {
//!   "locations": { "working": "out" },
//!   "feeds": [
//!     {
//!       "name": "staff",
//!       "file": "staff.csv",
//!       "rows": "rows/staff.json",
//!       "infields": [
//!         { "name": "id", "unique_id": true },
//!         { "name": "desc" },
//!         { "name": "for", "fors": 3 }
//!       ],
//!       "outfields": ["id", "desc", "for_1", "for_2", "for_3"]
//!     }
//!   ]
//! }
//! ```
//!
//! The config file location comes from `--config` or, failing that, the
//! `FEEDCSV_CONFIG` environment variable.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ConfigResult};

/// Environment variable naming the config file when `--config` is absent.
pub const CONFIG_ENV_VAR: &str = "FEEDCSV_CONFIG";

/// Top-level configuration: output locations plus feed definitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedsConfig {
    /// Filesystem locations.
    pub locations: Locations,
    /// Feed definitions, run in declared order.
    pub feeds: Vec<FeedConfig>,
}

/// Filesystem locations used by the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Locations {
    /// Directory the CSV outputs are written into.
    pub working: PathBuf,
}

/// One feed: a row source flattened into one CSV file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Feed name, used in logs and for `--feed` selection.
    pub name: String,
    /// Output CSV file name, created under the working directory.
    pub file: String,
    /// Rows file read by the JSON row source.
    pub rows: PathBuf,
    /// Ordered input field declarations, aligned with row cells.
    pub infields: Vec<FieldDecl>,
    /// Ordered output column names.
    pub outfields: Vec<String>,
}

/// One input field declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDecl {
    /// Field name; also the record key the cell value is stored under.
    pub name: String,
    /// Marks this field as the record's unique key.
    #[serde(default)]
    pub unique_id: bool,
    /// Marks this field as a repeating FOR attribute, bounded by the
    /// given number of slots.
    #[serde(default)]
    pub fors: Option<usize>,
}

impl FieldDecl {
    /// A plain field with no markers.
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            unique_id: false,
            fors: None,
        }
    }

    /// A field marked as the unique key.
    pub fn key(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            unique_id: true,
            fors: None,
        }
    }

    /// A field marked as a FOR field with the given slot bound.
    pub fn fors(name: impl Into<String>, bound: usize) -> Self {
        Self {
            name: name.into(),
            unique_id: false,
            fors: Some(bound),
        }
    }
}

impl FeedsConfig {
    /// Load configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    /// Parse configuration from a JSON string.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Look up a feed by name.
    pub fn feed(&self, name: &str) -> ConfigResult<&FeedConfig> {
        self.feeds
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| ConfigError::UnknownFeed(name.to_string()))
    }
}

/// Resolve the config file path from the CLI argument or the environment.
pub fn config_path(cli_arg: Option<PathBuf>) -> ConfigResult<PathBuf> {
    if let Some(path) = cli_arg {
        return Ok(path);
    }
    match std::env::var(CONFIG_ENV_VAR) {
        Ok(v) if !v.is_empty() => Ok(PathBuf::from(v)),
        _ => Err(ConfigError::NoConfigPath(CONFIG_ENV_VAR)),
    }
}
