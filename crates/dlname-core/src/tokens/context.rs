//! Raw per-download render context.

use chrono::NaiveDateTime;

use crate::config::Settings;
use crate::record::{DownloadItem, Tab};

use super::domain::{domain_source, extract_hostname};
use super::mime::resolve_extension_from_download;
use super::path::extract_basename;
use super::title::{resolve_download_title, TitleSources};

/// Raw inputs for one rendering, built once per download event.
///
/// Fields may be empty; the renderer substitutes placeholders for anything
/// that sanitizes away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    pub domain: String,
    pub title: String,
    pub ext: String,
    /// Local wall-clock time the name is generated for.
    pub date: NaiveDateTime,
    pub original_name: String,
}

impl RenderContext {
    /// Derives the context from a download record and its originating tab.
    pub fn from_download(
        item: &DownloadItem,
        tab: Option<&Tab>,
        settings: &Settings,
        date: NaiveDateTime,
    ) -> Self {
        let domain = extract_hostname(domain_source(item, tab));
        let title = resolve_download_title(
            TitleSources {
                tab_title: tab.map(|t| t.title.as_str()).unwrap_or_default(),
                url: item.source_url(),
                filename: &item.filename,
            },
            settings.max_title_length,
        );

        Self {
            domain,
            title,
            ext: resolve_extension_from_download(item),
            date,
            original_name: extract_basename(&item.filename).to_string(),
        }
    }
}
