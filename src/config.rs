use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::toml_file::{read_toml, write_toml};

const CONFIG_DIR_NAME: &str = ".hunkdiff";
const CONFIG_FILE_NAME: &str = "config.toml";
const DEFAULT_DIFF_CONTEXT_LINES: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Unchanged lines shown around each change in a file patch.
    pub diff_context_lines: u32,
    /// Reopen the file patch items saved in the last session.
    pub restore_open_items: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            diff_context_lines: DEFAULT_DIFF_CONTEXT_LINES,
            restore_open_items: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new() -> Result<Self> {
        let home_dir =
            dirs::home_dir().ok_or_else(|| anyhow!("failed to resolve home directory"))?;
        Ok(Self::at(home_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME)))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load_or_create_default(&self) -> Result<AppConfig> {
        if !self.path.exists() {
            let config = AppConfig::default();
            self.save(&config)?;
            return Ok(config);
        }

        read_toml(&self.path, "config")
    }

    pub fn save(&self, config: &AppConfig) -> Result<()> {
        write_toml(&self.path, config, "config")
    }
}
