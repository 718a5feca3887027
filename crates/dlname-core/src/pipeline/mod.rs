//! Event-driven rename pipeline.
//!
//! Each download notification runs once through [`Pipeline::handle`]: read
//! settings, wait (bounded) for the host to assign a filename, resolve the
//! originating tab, and hand a decision to the rename sink. Host failures
//! only ever reduce the context available; they never abort a decision.

mod decide;
mod retry;
mod tracker;

use chrono::NaiveDateTime;
use std::sync::Arc;

use crate::config::Settings;
use crate::host::{DownloadSource, RenameSink, SettingsStore, Suggestion, TabResolver};
use crate::record::DownloadItem;

pub use decide::{decide, resolve_tab, Decision, KeepReason};
pub use retry::{RetryDecision, RetryPolicy};
pub use tracker::{DownloadState, Tracker, SETTLED_CAPACITY};

/// Source of the local wall-clock time used for the date tokens.
pub type Clock = Arc<dyn Fn() -> NaiveDateTime + Send + Sync>;

/// Result of handling one notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A rename was suggested to the host.
    Renamed(String),
    /// The host was told to keep the original name.
    Kept(KeepReason),
    /// No filename appeared within the retry budget; original name kept.
    Abandoned,
    /// Another run owns this download, or it was renamed already. The sink
    /// is not called.
    AlreadyHandled,
}

pub struct Pipeline {
    settings: Arc<dyn SettingsStore>,
    tabs: Arc<dyn TabResolver>,
    downloads: Arc<dyn DownloadSource>,
    sink: Arc<dyn RenameSink>,
    tracker: Tracker,
    clock: Clock,
}

impl Pipeline {
    pub fn new(
        settings: Arc<dyn SettingsStore>,
        tabs: Arc<dyn TabResolver>,
        downloads: Arc<dyn DownloadSource>,
        sink: Arc<dyn RenameSink>,
    ) -> Self {
        Self {
            settings,
            tabs,
            downloads,
            sink,
            tracker: Tracker::new(),
            clock: Arc::new(|| chrono::Local::now().naive_local()),
        }
    }

    /// Replaces the wall clock, e.g. to pin the date tokens.
    pub fn with_clock(mut self, clock: impl Fn() -> NaiveDateTime + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    async fn read_settings(&self) -> Settings {
        match self.settings.read().await {
            Ok(settings) => settings,
            Err(err) => {
                tracing::warn!("settings unavailable, using defaults: {:#}", err);
                Settings::default()
            }
        }
    }

    /// Handles one download notification and reports the verdict to the sink.
    pub async fn handle(&self, item: DownloadItem) -> Outcome {
        let id = item.id;
        if !self.tracker.begin(id) {
            tracing::debug!(id, "download already handled or in flight");
            return Outcome::AlreadyHandled;
        }

        let outcome = self.run(item).await;
        match &outcome {
            Outcome::Renamed(filename) => {
                self.tracker.finish_renamed(id);
                tracing::info!(id, %filename, "suggesting rename");
                self.sink.suggest(id, Suggestion::uniquify(filename.clone())).await;
            }
            Outcome::Kept(reason) => {
                self.tracker.release(id);
                tracing::debug!(id, ?reason, "keeping original name");
                self.sink.keep(id).await;
            }
            Outcome::Abandoned => {
                self.tracker.release(id);
                self.sink.keep(id).await;
            }
            Outcome::AlreadyHandled => {}
        }
        outcome
    }

    async fn run(&self, mut item: DownloadItem) -> Outcome {
        let settings = self.read_settings().await;
        if !settings.enabled {
            return Outcome::Kept(KeepReason::Disabled);
        }

        let policy = RetryPolicy::from(settings.retry);
        let mut attempt = 1u32;
        while item.filename.is_empty() {
            match policy.decide(attempt) {
                RetryDecision::NoRetry => {
                    tracing::info!(id = item.id, attempts = attempt, "filename never assigned, leaving download as is");
                    return Outcome::Abandoned;
                }
                RetryDecision::RetryAfter(delay) => {
                    tracing::debug!(id = item.id, attempt, ?delay, "filename not assigned yet, retrying");
                    tokio::time::sleep(delay).await;
                    attempt = self.tracker.record_attempt(item.id);
                    if let Some(fresh) = self.downloads.refresh(item.id).await {
                        item = fresh;
                    }
                }
            }
        }

        let tab = resolve_tab(&item, self.tabs.as_ref(), settings.tab_fallback).await;
        match decide(&item, tab.as_ref(), &settings, (self.clock)()) {
            Decision::Rename(filename) => Outcome::Renamed(filename),
            Decision::Keep(reason) => Outcome::Kept(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{MemoryDownloads, MemorySettingsStore, RecordingSink, SinkEvent, StaticTabs};
    use crate::template::sample_date;

    struct Harness {
        pipeline: Pipeline,
        downloads: Arc<MemoryDownloads>,
        sink: Arc<RecordingSink>,
    }

    fn harness(settings: Settings) -> Harness {
        let downloads = Arc::new(MemoryDownloads::new());
        let sink = Arc::new(RecordingSink::new());
        let pipeline = Pipeline::new(
            Arc::new(MemorySettingsStore::new(settings)),
            Arc::new(StaticTabs::default()),
            downloads.clone(),
            sink.clone(),
        )
        .with_clock(sample_date);
        Harness {
            pipeline,
            downloads,
            sink,
        }
    }

    fn fast_retry(max_attempts: u32) -> Settings {
        let mut s = Settings::default();
        s.retry.max_attempts = max_attempts;
        s.retry.delay_ms = 1;
        s
    }

    fn download(id: u64, filename: &str) -> DownloadItem {
        DownloadItem {
            id,
            filename: filename.to_string(),
            url: "https://example.com/a/manual.pdf".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn renames_once_per_download() {
        let h = harness(Settings::default());
        let first = h.pipeline.handle(download(1, "manual.pdf")).await;
        assert_eq!(first, Outcome::Renamed("example.com_manual_2024-05-02.pdf".to_string()));
        let second = h.pipeline.handle(download(1, "manual.pdf")).await;
        assert_eq!(second, Outcome::AlreadyHandled);
        assert_eq!(h.sink.events().len(), 1);
        assert_eq!(h.pipeline.tracker().state(1), Some(DownloadState::Renamed));
    }

    #[tokio::test]
    async fn exhausted_retries_abandon_and_release() {
        let h = harness(fast_retry(3));
        let outcome = h.pipeline.handle(download(2, "")).await;
        assert_eq!(outcome, Outcome::Abandoned);
        assert_eq!(h.sink.events(), vec![SinkEvent::Kept(2)]);
        assert_eq!(h.pipeline.tracker().state(2), None);
        assert_eq!(h.pipeline.tracker().in_flight(), 0);
    }

    #[tokio::test]
    async fn retry_picks_up_assigned_filename() {
        let h = harness(fast_retry(4));
        h.downloads.upsert(&download(3, "manual.pdf"));
        let outcome = h.pipeline.handle(download(3, "")).await;
        assert_eq!(outcome, Outcome::Renamed("example.com_manual_2024-05-02.pdf".to_string()));
    }

    struct UnreadableSettings;

    #[async_trait::async_trait]
    impl SettingsStore for UnreadableSettings {
        async fn read(&self) -> anyhow::Result<Settings> {
            anyhow::bail!("storage unavailable")
        }

        async fn write(&self, _settings: &Settings) -> anyhow::Result<()> {
            anyhow::bail!("storage unavailable")
        }
    }

    #[tokio::test]
    async fn unreadable_settings_fall_back_to_defaults() {
        let sink = Arc::new(RecordingSink::new());
        let pipeline = Pipeline::new(
            Arc::new(UnreadableSettings),
            Arc::new(StaticTabs::default()),
            Arc::new(MemoryDownloads::new()),
            sink.clone(),
        )
        .with_clock(sample_date);

        let outcome = pipeline.handle(download(5, "manual.pdf")).await;
        assert_eq!(outcome, Outcome::Renamed("example.com_manual_2024-05-02.pdf".to_string()));
        assert_eq!(
            sink.events(),
            vec![SinkEvent::Suggested(
                5,
                Suggestion::uniquify("example.com_manual_2024-05-02.pdf")
            )]
        );
    }

    #[tokio::test]
    async fn disabled_skips_without_waiting() {
        let mut settings = fast_retry(1000);
        settings.enabled = false;
        let h = harness(settings);
        let outcome = h.pipeline.handle(download(4, "")).await;
        assert_eq!(outcome, Outcome::Kept(KeepReason::Disabled));
        assert!(h.pipeline.tracker().begin(4));
    }
}
