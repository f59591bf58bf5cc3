use std::fs;
use std::path::Path;

use anyhow::{Context as _, Result, anyhow};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Reads a TOML file; `kind` names the file in error messages ("config", "state").
pub(crate) fn read_toml<T: DeserializeOwned>(path: &Path, kind: &str) -> Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {kind} file at {}", path.display()))?;
    toml::from_str::<T>(&raw)
        .with_context(|| format!("failed to parse TOML {kind} file at {}", path.display()))
}

/// Writes `value` as pretty TOML, creating parent directories first.
pub(crate) fn write_toml<T: Serialize>(path: &Path, value: &T, kind: &str) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| anyhow!("{kind} path has no parent: {}", path.display()))?;

    fs::create_dir_all(parent)
        .with_context(|| format!("failed to create {kind} directory {}", parent.display()))?;

    let contents = toml::to_string_pretty(value)
        .with_context(|| format!("failed to serialize {kind} to TOML"))?;
    fs::write(path, contents)
        .with_context(|| format!("failed to write {kind} file at {}", path.display()))
}
