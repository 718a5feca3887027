//! The rename decision for a single download.

use chrono::NaiveDateTime;

use crate::config::Settings;
use crate::host::TabResolver;
use crate::record::{DownloadItem, Tab};
use crate::template::build_filename;
use crate::tokens::{
    build_referrer_pattern, domain_source, extract_basename, extract_hostname, is_blacklisted,
    pick_tab_by_referrer, sanitize_domain, RenderContext, TabFallback,
};

/// Why a download keeps its original name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeepReason {
    /// Renaming is switched off.
    Disabled,
    /// The download's domain is blacklisted.
    Blacklisted,
    /// The rendered name equals the current basename.
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Rename(String),
    Keep(KeepReason),
}

/// Finds the tab a download came from.
///
/// A usable tab id is looked up directly; otherwise open tabs on the
/// referrer's origin are matched against the referrer. Lookup failures
/// simply yield `None`.
pub async fn resolve_tab(
    item: &DownloadItem,
    tabs: &dyn TabResolver,
    fallback: TabFallback,
) -> Option<Tab> {
    if let Some(tab_id) = item.origin_tab() {
        let tab = tabs.by_id(tab_id).await;
        if tab.is_none() {
            tracing::debug!(id = item.id, tab_id, "originating tab not available");
        }
        return tab;
    }

    let pattern = build_referrer_pattern(&item.referrer);
    if pattern.is_empty() {
        return None;
    }
    let candidates = tabs.query(&pattern).await;
    pick_tab_by_referrer(&item.referrer, &candidates, fallback).cloned()
}

/// Decides whether and how to rename `item`. Pure apart from the inputs.
pub fn decide(
    item: &DownloadItem,
    tab: Option<&Tab>,
    settings: &Settings,
    now: NaiveDateTime,
) -> Decision {
    if !settings.enabled {
        return Decision::Keep(KeepReason::Disabled);
    }

    let host = extract_hostname(domain_source(item, tab));
    let domain = sanitize_domain(&host, settings.remove_www);
    if is_blacklisted(&host, &domain, &settings.domain_blacklist) {
        tracing::debug!(id = item.id, %domain, "domain blacklisted");
        return Decision::Keep(KeepReason::Blacklisted);
    }

    let ctx = RenderContext::from_download(item, tab, settings, now);
    // Never without an alphanumeric: unusable renders fall back.
    let target = build_filename(&ctx, settings);
    if extract_basename(&item.filename) == target {
        return Decision::Keep(KeepReason::Unchanged);
    }
    Decision::Rename(target)
}
