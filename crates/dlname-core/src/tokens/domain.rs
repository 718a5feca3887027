//! Hostname extraction and domain token normalization.

use crate::record::{DownloadItem, Tab};

/// Lower-cases `hostname` and optionally strips a leading `www.` label.
pub fn sanitize_domain(hostname: &str, remove_www: bool) -> String {
    let normalized = hostname.to_lowercase();
    match normalized.strip_prefix("www.") {
        Some(rest) if remove_www => rest.to_string(),
        _ => normalized,
    }
}

/// Host component of an absolute URL; empty for malformed, relative or hostless URLs.
pub fn extract_hostname(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_string))
        .unwrap_or_default()
}

/// URL whose host names the download: the tab's page, else the final URL, else the URL.
pub fn domain_source<'a>(item: &'a DownloadItem, tab: Option<&'a Tab>) -> &'a str {
    match tab {
        Some(tab) if !tab.url.is_empty() => &tab.url,
        _ => item.source_url(),
    }
}

/// Case-insensitive exact match of either the raw host or the normalized
/// domain against the blacklist.
pub fn is_blacklisted(hostname: &str, domain: &str, blacklist: &[String]) -> bool {
    if hostname.is_empty() && domain.is_empty() {
        return false;
    }
    blacklist.iter().map(|entry| entry.trim()).any(|entry| {
        !entry.is_empty() && (entry.eq_ignore_ascii_case(hostname) || entry.eq_ignore_ascii_case(domain))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_domain_lowercases_and_strips_www() {
        assert_eq!(sanitize_domain("WWW.Example.COM", true), "example.com");
        assert_eq!(sanitize_domain("WWW.Example.COM", false), "www.example.com");
        assert_eq!(sanitize_domain("wwwexample.com", true), "wwwexample.com");
        assert_eq!(sanitize_domain("", true), "");
    }

    #[test]
    fn hostname_from_urls() {
        assert_eq!(extract_hostname("https://Sub.Example.com:8443/x?y"), "sub.example.com");
        assert_eq!(extract_hostname("/relative/path"), "");
        assert_eq!(extract_hostname("::::"), "");
        assert_eq!(extract_hostname(""), "");
        assert_eq!(extract_hostname("data:text/plain,hi"), "");
    }

    #[test]
    fn domain_source_prefers_tab_then_final_url() {
        let item = DownloadItem {
            url: "https://a.example/x".to_string(),
            final_url: "https://b.example/x".to_string(),
            ..Default::default()
        };
        let tab = Tab {
            url: "https://page.example/".to_string(),
            ..Default::default()
        };
        assert_eq!(domain_source(&item, Some(&tab)), "https://page.example/");
        assert_eq!(domain_source(&item, None), "https://b.example/x");
        let blank = Tab::default();
        assert_eq!(domain_source(&item, Some(&blank)), "https://b.example/x");
    }

    #[test]
    fn blacklist_matches_case_insensitively() {
        let list = vec!["Example.com".to_string(), " tracker.net ".to_string()];
        assert!(is_blacklisted("www.example.com", "example.com", &list));
        assert!(is_blacklisted("tracker.net", "tracker.net", &list));
        assert!(!is_blacklisted("sub.example.com", "sub.example.com", &list));
        assert!(!is_blacklisted("", "", &list));
    }
}
