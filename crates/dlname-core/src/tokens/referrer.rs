//! Referrer-based lookup of the originating tab.

use serde::{Deserialize, Serialize};

use crate::record::Tab;

/// What to do when no tab URL equals the referrer exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TabFallback {
    /// Take the first candidate tab that has any URL. Candidates all share the
    /// referrer's origin, but with several open this may pick the wrong page.
    #[default]
    FirstWithUrl,
    /// Only an exact URL match counts.
    ExactOnly,
}

/// Tab query pattern `scheme://host[:port]/*` for a referrer URL.
///
/// Empty, unparseable, or hostless referrers yield an empty string.
pub fn build_referrer_pattern(referrer: &str) -> String {
    if referrer.is_empty() {
        return String::new();
    }
    let Ok(parsed) = url::Url::parse(referrer) else {
        return String::new();
    };
    let Some(host) = parsed.host_str() else {
        return String::new();
    };
    match parsed.port() {
        Some(port) => format!("{}://{}:{}/*", parsed.scheme(), host, port),
        None => format!("{}://{}/*", parsed.scheme(), host),
    }
}

/// Picks the tab a download most likely came from.
pub fn pick_tab_by_referrer<'a>(
    referrer: &str,
    tabs: &'a [Tab],
    fallback: TabFallback,
) -> Option<&'a Tab> {
    if referrer.is_empty() || tabs.is_empty() {
        return None;
    }
    if let Some(exact) = tabs.iter().find(|tab| tab.url == referrer) {
        return Some(exact);
    }
    match fallback {
        TabFallback::FirstWithUrl => tabs.iter().find(|tab| !tab.url.is_empty()),
        TabFallback::ExactOnly => None,
    }
}
