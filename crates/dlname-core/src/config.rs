use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::template::{is_legacy_pattern, migrate_legacy_pattern};
use crate::tokens::TabFallback;

/// Settings schema version written by this build.
pub const CURRENT_VERSION: u32 = 2;

/// Default filename pattern.
pub const DEFAULT_PATTERN: &str = "{domain}_{title}_{date}.{ext}";

/// Errors loading or saving the settings file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot locate XDG base directories: {0}")]
    Xdg(#[from] xdg::BaseDirectoriesError),
    #[error("config I/O at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Retry budget for downloads whose filename the host has not assigned yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Fixed delay between attempts, in milliseconds.
    pub delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay_ms: 500,
        }
    }
}

impl RetryConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// User settings loaded from `~/.config/dlname/config.toml`.
///
/// Every field has a default, so partial files (and settings exported from
/// older releases in camelCase) load cleanly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Schema version. Files without one predate versioning.
    #[serde(default = "legacy_version")]
    pub version: u32,
    /// Master switch for renaming.
    pub enabled: bool,
    /// Filename pattern using `{domain}`, `{title}`, `{date}`, `{year}`,
    /// `{ext}` and `{original_name}`. `/` routes into sub-folders.
    #[serde(alias = "filenamePattern", alias = "template")]
    pub filename_pattern: String,
    /// Truncate titles to this many characters (0 = no limit).
    #[serde(alias = "maxTitleLength")]
    pub max_title_length: usize,
    /// Strip a leading `www.` from the domain token.
    #[serde(alias = "removeWww")]
    pub remove_www: bool,
    /// Domains (case-insensitive, exact) whose downloads are never renamed.
    #[serde(alias = "domainBlacklist")]
    pub domain_blacklist: Vec<String>,
    /// Tab choice when no tab URL equals the download's referrer.
    #[serde(alias = "tabFallback")]
    pub tab_fallback: TabFallback,
    pub retry: RetryConfig,
}

fn legacy_version() -> u32 {
    1
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            enabled: true,
            filename_pattern: DEFAULT_PATTERN.to_string(),
            max_title_length: 80,
            remove_www: true,
            domain_blacklist: Vec::new(),
            tab_fallback: TabFallback::default(),
            retry: RetryConfig::default(),
        }
    }
}

impl Settings {
    /// Brings settings from an older schema up to [`CURRENT_VERSION`].
    ///
    /// Version 1 patterns used `%name%` placeholders; they are rewritten to
    /// `{name}`. Returns whether anything changed.
    pub fn migrate(&mut self) -> bool {
        if self.version >= CURRENT_VERSION && !is_legacy_pattern(&self.filename_pattern) {
            return false;
        }
        let migrated = migrate_legacy_pattern(self.filename_pattern.trim());
        tracing::info!(
            from = self.version,
            to = CURRENT_VERSION,
            pattern = %migrated,
            "migrated settings"
        );
        self.filename_pattern = migrated;
        self.version = CURRENT_VERSION;
        true
    }

    /// Parses settings from TOML text and migrates them.
    pub fn from_toml(data: &str) -> Result<Self, toml::de::Error> {
        let mut settings: Settings = toml::from_str(data)?;
        settings.migrate();
        Ok(settings)
    }

    /// Parses settings from JSON (e.g. exported browser storage) and migrates them.
    pub fn from_json(data: &str) -> serde_json::Result<Self> {
        let mut settings: Settings = serde_json::from_str(data)?;
        settings.migrate();
        Ok(settings)
    }
}

pub fn config_path() -> Result<PathBuf, ConfigError> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("dlname")?;
    let path = xdg_dirs
        .place_config_file("config.toml")
        .map_err(|source| ConfigError::Io {
            path: xdg_dirs.get_config_home(),
            source,
        })?;
    Ok(path)
}

/// Load settings from `path`, creating it with defaults if missing.
///
/// A migrated file is written back so the upgrade happens once.
pub fn load_or_init_at(path: &Path) -> Result<Settings, ConfigError> {
    if !path.exists() {
        let settings = Settings::default();
        save_to(path, &settings)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(settings);
    }

    let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut settings: Settings = toml::from_str(&data).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    if settings.migrate() {
        save_to(path, &settings)?;
    }
    Ok(settings)
}

pub fn save_to(path: &Path, settings: &Settings) -> Result<(), ConfigError> {
    let toml = toml::to_string_pretty(settings)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, toml).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}
