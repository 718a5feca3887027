//! Settings store backed by the TOML config file.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;

use super::SettingsStore;
use crate::config::Settings;

/// Reads and writes settings at a fixed path, re-reading on every call so
/// edits made while the pipeline runs take effect on the next download.
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SettingsStore for FileSettingsStore {
    async fn read(&self) -> Result<Settings> {
        let data = match tokio::fs::read_to_string(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Settings::default()),
            Err(e) => {
                return Err(e).with_context(|| format!("read settings {}", self.path.display()))
            }
        };
        Settings::from_toml(&data).with_context(|| format!("parse settings {}", self.path.display()))
    }

    async fn write(&self, settings: &Settings) -> Result<()> {
        let toml = toml::to_string_pretty(settings).context("serialize settings")?;
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("create {}", parent.display()))?;
        }
        tokio::fs::write(&self.path, toml)
            .await
            .with_context(|| format!("write settings {}", self.path.display()))
    }
}
