use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::pane::SerializedItem;
use crate::toml_file::{read_toml, write_toml};

const APP_DATA_DIR_NAME: &str = "hunk";
const STATE_FILE_NAME: &str = "state.toml";

/// Session state carried between runs. Open items are kept only as their
/// serialized records; everything else is rebuilt on restore.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppState {
    pub last_project_path: Option<PathBuf>,
    pub open_items: Vec<SerializedItem>,
}

#[derive(Debug, Clone)]
pub struct AppStateStore {
    path: PathBuf,
}

impl AppStateStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_local_dir()
            .or_else(dirs::data_dir)
            .or_else(dirs::home_dir)
            .ok_or_else(|| anyhow!("failed to resolve app data directory"))?;
        Ok(Self::at(base_dir.join(APP_DATA_DIR_NAME).join(STATE_FILE_NAME)))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load_or_default(&self) -> Result<AppState> {
        if !self.path.exists() {
            return Ok(AppState::default());
        }

        read_toml(&self.path, "state")
    }

    pub fn save(&self, state: &AppState) -> Result<()> {
        write_toml(&self.path, state, "state")
    }
}
