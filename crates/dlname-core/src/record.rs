//! Host records: downloads and tabs as delivered by the browser.
//!
//! Every field is tolerant of being absent, `null`, or empty. Field names
//! accept both snake_case and the browser's camelCase spelling so records
//! exported straight from the extension APIs deserialize unchanged.

use serde::{Deserialize, Deserializer, Serialize};

/// Download identifier assigned by the host.
pub type DownloadId = u64;

/// A download record `{id, filename, url, finalUrl, referrer, tabId, mime}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadItem {
    pub id: DownloadId,
    /// Suggested or assigned filename; may carry directory components.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub filename: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub url: String,
    #[serde(default, alias = "finalUrl", deserialize_with = "null_as_empty")]
    pub final_url: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub referrer: String,
    /// Originating tab; negative values mean "no tab" (`-1` in the browser).
    #[serde(default, alias = "tabId")]
    pub tab_id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub mime: String,
}

impl DownloadItem {
    /// Originating tab id, if the host attached a usable one.
    pub fn origin_tab(&self) -> Option<i64> {
        self.tab_id.filter(|id| *id >= 0)
    }

    /// Final URL if known, else the original URL.
    pub fn source_url(&self) -> &str {
        if self.final_url.is_empty() {
            &self.url
        } else {
            &self.final_url
        }
    }
}

/// A browser tab `{id, url, title}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tab {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn download_accepts_camel_case_and_nulls() {
        let json = r#"{
            "id": 7,
            "filename": "/home/u/Downloads/report.pdf",
            "url": "https://example.com/r",
            "finalUrl": "https://cdn.example.com/report.pdf",
            "referrer": null,
            "tabId": -1
        }"#;
        let item: DownloadItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, 7);
        assert_eq!(item.final_url, "https://cdn.example.com/report.pdf");
        assert_eq!(item.referrer, "");
        assert_eq!(item.mime, "");
        assert_eq!(item.origin_tab(), None);
        assert_eq!(item.source_url(), "https://cdn.example.com/report.pdf");
    }

    #[test]
    fn source_url_falls_back_to_url() {
        let item = DownloadItem {
            url: "https://example.com/a.zip".to_string(),
            tab_id: Some(3),
            ..Default::default()
        };
        assert_eq!(item.source_url(), "https://example.com/a.zip");
        assert_eq!(item.origin_tab(), Some(3));
    }

    #[test]
    fn tab_with_missing_fields() {
        let tab: Tab = serde_json::from_str(r#"{"id": 2}"#).unwrap();
        assert_eq!(tab.id, Some(2));
        assert!(tab.url.is_empty());
        assert!(tab.title.is_empty());
    }
}
