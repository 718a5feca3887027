//! `dlname watch` – drive the rename pipeline from JSON-lines download events.
//!
//! Each stdin line is one download record as the browser reports it. A
//! later line for the same id updates the known record, which is how a
//! download waiting for its filename gets unstuck. Decisions go to stdout,
//! one JSON object per line.

use anyhow::{Context, Result};
use async_trait::async_trait;
use dlname_core::host::{FileSettingsStore, MemoryDownloads, RenameSink, StaticTabs, Suggestion};
use dlname_core::pipeline::{Outcome, Pipeline};
use dlname_core::record::{DownloadId, DownloadItem, Tab};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;

/// One output line.
#[derive(Debug, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub(crate) enum Verdict<'a> {
    Rename {
        id: DownloadId,
        #[serde(flatten)]
        suggestion: &'a Suggestion,
    },
    Keep {
        id: DownloadId,
    },
}

struct StdoutSink;

fn print_verdict(verdict: &Verdict<'_>) {
    match serde_json::to_string(verdict) {
        Ok(line) => println!("{line}"),
        Err(e) => tracing::error!("serialize verdict: {e}"),
    }
}

#[async_trait]
impl RenameSink for StdoutSink {
    async fn suggest(&self, id: DownloadId, suggestion: Suggestion) {
        print_verdict(&Verdict::Rename {
            id,
            suggestion: &suggestion,
        });
    }

    async fn keep(&self, id: DownloadId) {
        print_verdict(&Verdict::Keep { id });
    }
}

fn load_tabs(path: Option<&Path>) -> Result<Vec<Tab>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    let data =
        std::fs::read_to_string(path).with_context(|| format!("read tabs {}", path.display()))?;
    serde_json::from_str(&data).with_context(|| format!("parse tabs {}", path.display()))
}

/// Parses one event line; blank or malformed lines are skipped.
pub(crate) fn parse_event(line: &str) -> Option<DownloadItem> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match serde_json::from_str(line) {
        Ok(item) => Some(item),
        Err(e) => {
            tracing::warn!("skipping malformed download event: {e}");
            None
        }
    }
}

/// Logs a finished run and drops the stored record once its outcome is
/// terminal. A later line for the same id starts from what that line carries.
pub(crate) fn settle(downloads: &MemoryDownloads, id: DownloadId, outcome: &Outcome) {
    tracing::debug!(id, ?outcome, "download handled");
    match outcome {
        Outcome::Renamed(_) | Outcome::Kept(_) | Outcome::Abandoned => downloads.remove(id),
        Outcome::AlreadyHandled => {}
    }
}

pub async fn run_watch(config_path: &Path, tabs: Option<&Path>) -> Result<()> {
    let tabs = load_tabs(tabs)?;
    tracing::info!(tabs = tabs.len(), config = %config_path.display(), "watching stdin for download events");

    let downloads = Arc::new(MemoryDownloads::new());
    let pipeline = Arc::new(Pipeline::new(
        Arc::new(FileSettingsStore::new(config_path)),
        Arc::new(StaticTabs::new(tabs)),
        downloads.clone(),
        Arc::new(StdoutSink),
    ));

    let mut tasks = JoinSet::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("read stdin")? {
        while let Some(joined) = tasks.try_join_next() {
            match joined {
                Ok((id, outcome)) => settle(&downloads, id, &outcome),
                Err(e) => tracing::warn!("pipeline task failed: {e}"),
            }
        }

        let Some(item) = parse_event(&line) else {
            continue;
        };
        downloads.upsert(&item);
        let pipeline = Arc::clone(&pipeline);
        tasks.spawn(async move { (item.id, pipeline.handle(item).await) });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((id, outcome)) => settle(&downloads, id, &outcome),
            Err(e) => tracing::warn!("pipeline task failed: {e}"),
        }
    }
    Ok(())
}
