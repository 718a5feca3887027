//! Capabilities the browser host provides to the rename pipeline.
//!
//! The pipeline never touches ambient globals: settings storage, tab lookup,
//! download records and the rename callback are injected through these
//! traits so the core can run (and be tested) without a browser.

mod file;
mod memory;

use async_trait::async_trait;
use serde::Serialize;

use crate::config::Settings;
use crate::record::{DownloadId, DownloadItem, Tab};

pub use file::FileSettingsStore;
pub use memory::{MemoryDownloads, MemorySettingsStore, RecordingSink, SinkEvent, StaticTabs};

/// Persistent settings storage.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Current settings, with defaults for any unset field.
    async fn read(&self) -> anyhow::Result<Settings>;
    async fn write(&self, settings: &Settings) -> anyhow::Result<()>;
}

/// Tab lookup. Any failure (closed tab, no permission) is reported as
/// "nothing found", never as an error.
#[async_trait]
pub trait TabResolver: Send + Sync {
    async fn by_id(&self, tab_id: i64) -> Option<Tab>;
    /// Tabs whose URL matches a `scheme://host/*` pattern.
    async fn query(&self, url_pattern: &str) -> Vec<Tab>;
}

/// Fresh download records, for retrying while the host has not assigned a
/// filename yet.
#[async_trait]
pub trait DownloadSource: Send + Sync {
    async fn refresh(&self, id: DownloadId) -> Option<DownloadItem>;
}

/// How the host resolves a name collision for a suggested filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictAction {
    /// Append a counter to make the name unique.
    #[default]
    Uniquify,
}

/// A rename suggestion handed back to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub filename: String,
    pub conflict_action: ConflictAction,
}

impl Suggestion {
    pub fn uniquify(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            conflict_action: ConflictAction::Uniquify,
        }
    }
}

/// Receives the pipeline's verdict for each download.
#[async_trait]
pub trait RenameSink: Send + Sync {
    async fn suggest(&self, id: DownloadId, suggestion: Suggestion);
    /// Keep the host's original filename.
    async fn keep(&self, id: DownloadId);
}
