//! In-process host implementations: fixed tab lists, a download table fed
//! by incoming events, and a sink that records decisions.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use super::{DownloadSource, RenameSink, SettingsStore, Suggestion, TabResolver};
use crate::config::Settings;
use crate::record::{DownloadId, DownloadItem, Tab};

/// Settings held in memory.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    settings: Mutex<Settings>,
}

impl MemorySettingsStore {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: Mutex::new(settings),
        }
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn read(&self) -> anyhow::Result<Settings> {
        Ok(self.settings.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    async fn write(&self, settings: &Settings) -> anyhow::Result<()> {
        *self.settings.lock().unwrap_or_else(PoisonError::into_inner) = settings.clone();
        Ok(())
    }
}

/// A fixed set of open tabs.
#[derive(Debug, Clone, Default)]
pub struct StaticTabs {
    tabs: Vec<Tab>,
}

impl StaticTabs {
    pub fn new(tabs: Vec<Tab>) -> Self {
        Self { tabs }
    }
}

/// True when `url` falls under a `scheme://host/*` pattern.
fn matches_pattern(url: &str, pattern: &str) -> bool {
    match pattern.strip_suffix('*') {
        Some(prefix) => url.starts_with(prefix),
        None => url == pattern,
    }
}

#[async_trait]
impl TabResolver for StaticTabs {
    async fn by_id(&self, tab_id: i64) -> Option<Tab> {
        self.tabs.iter().find(|t| t.id == Some(tab_id)).cloned()
    }

    async fn query(&self, url_pattern: &str) -> Vec<Tab> {
        if url_pattern.is_empty() {
            return Vec::new();
        }
        self.tabs
            .iter()
            .filter(|t| matches_pattern(&t.url, url_pattern))
            .cloned()
            .collect()
    }
}

/// Latest known record per download id.
#[derive(Debug, Default)]
pub struct MemoryDownloads {
    items: Mutex<HashMap<DownloadId, DownloadItem>>,
}

impl MemoryDownloads {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the newest state of a download, merging non-empty fields over
    /// what is already known.
    pub fn upsert(&self, item: &DownloadItem) {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        let entry = items.entry(item.id).or_insert_with(|| DownloadItem {
            id: item.id,
            ..Default::default()
        });
        merge_field(&mut entry.filename, &item.filename);
        merge_field(&mut entry.url, &item.url);
        merge_field(&mut entry.final_url, &item.final_url);
        merge_field(&mut entry.referrer, &item.referrer);
        merge_field(&mut entry.mime, &item.mime);
        if item.tab_id.is_some() {
            entry.tab_id = item.tab_id;
        }
    }

    pub fn remove(&self, id: DownloadId) {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
    }
}

fn merge_field(current: &mut String, update: &str) {
    if !update.is_empty() {
        *current = update.to_string();
    }
}

#[async_trait]
impl DownloadSource for MemoryDownloads {
    async fn refresh(&self, id: DownloadId) -> Option<DownloadItem> {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }
}

/// A decision delivered to [`RecordingSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Suggested(DownloadId, Suggestion),
    Kept(DownloadId),
}

/// Sink that records every decision in order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SinkEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SinkEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn push(&self, event: SinkEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

#[async_trait]
impl RenameSink for RecordingSink {
    async fn suggest(&self, id: DownloadId, suggestion: Suggestion) {
        self.push(SinkEvent::Suggested(id, suggestion));
    }

    async fn keep(&self, id: DownloadId) {
        self.push(SinkEvent::Kept(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tab(id: i64, url: &str) -> Tab {
        Tab {
            id: Some(id),
            url: url.to_string(),
            title: String::new(),
        }
    }

    #[tokio::test]
    async fn static_tabs_query_by_origin() {
        let tabs = StaticTabs::new(vec![
            tab(1, "https://example.com/a"),
            tab(2, "https://other.org/b"),
            tab(3, "https://example.com/c?x"),
        ]);
        let hits = tabs.query("https://example.com/*").await;
        let ids: Vec<_> = hits.iter().filter_map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(tabs.query("").await.is_empty());
        assert_eq!(tabs.by_id(2).await.map(|t| t.url), Some("https://other.org/b".to_string()));
        assert!(tabs.by_id(9).await.is_none());
    }

    #[tokio::test]
    async fn downloads_merge_updates() {
        let downloads = MemoryDownloads::new();
        downloads.upsert(&DownloadItem {
            id: 5,
            url: "https://example.com/f".to_string(),
            tab_id: Some(1),
            ..Default::default()
        });
        downloads.upsert(&DownloadItem {
            id: 5,
            filename: "f.bin".to_string(),
            ..Default::default()
        });
        let item = downloads.refresh(5).await.unwrap();
        assert_eq!(item.url, "https://example.com/f");
        assert_eq!(item.filename, "f.bin");
        assert_eq!(item.tab_id, Some(1));

        downloads.remove(5);
        assert!(downloads.refresh(5).await.is_none());
    }

    #[tokio::test]
    async fn memory_settings_roundtrip() {
        let store = MemorySettingsStore::default();
        let mut s = store.read().await.unwrap();
        s.enabled = false;
        store.write(&s).await.unwrap();
        assert!(!store.read().await.unwrap().enabled);
    }
}
