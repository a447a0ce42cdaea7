//! Runtime configuration for the command-line front end
//!
//! AppConfig is rebuilt on every invocation from the command line and the
//! environment. Nothing here is persisted; user choices such as the spacing
//! profile live in the data directory itself.

use anyhow::{anyhow, Result};
use std::path::PathBuf;

/// Environment variable overriding the default data directory
pub const DATA_DIR_ENV: &str = "FAMILYTREE_DATA_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Directory holding one JSON file per stored key
    pub data_dir: PathBuf,
}

impl AppConfig {
    /// Resolve the data directory.
    ///
    /// Precedence: `--data-dir`, then `FAMILYTREE_DATA_DIR`, then
    /// `~/.familytree/data`.
    pub fn resolve(data_dir: Option<PathBuf>) -> Result<Self> {
        let env_dir = std::env::var_os(DATA_DIR_ENV).map(PathBuf::from);
        let data_dir = match data_dir.or(env_dir) {
            Some(dir) => dir,
            None => default_data_dir()?,
        };

        Ok(AppConfig { data_dir })
    }
}

pub fn default_data_dir() -> Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| anyhow!("Failed to get home directory"))?;
    Ok(home_dir.join(".familytree").join("data"))
}
