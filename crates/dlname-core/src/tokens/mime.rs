//! Extension token: MIME lookup and reconciliation of all extension signals.

use crate::record::DownloadItem;

use super::path::{extract_extension_from_name, extract_extension_from_url, sanitize_extension};

/// MIME types whose extension is not simply their subtype.
const MIME_EXTENSIONS: &[(&str, &str)] = &[
    ("image/avif", "avif"),
    ("image/gif", "gif"),
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/svg+xml", "svg"),
    ("image/webp", "webp"),
    ("application/pdf", "pdf"),
    ("application/zip", "zip"),
    ("application/x-zip-compressed", "zip"),
];

/// Extension implied by a MIME type, via the fixed table or the subtype.
///
/// The table is matched on the lowercased essence, so `image/JPEG;
/// charset=binary` still maps to `jpg`.
///
/// Subtype parsing drops `;` parameters and any `+suffix`, keeps the last
/// dotted vendor segment, and unwraps an `x-` prefix
/// (`application/vnd.ms-excel` → `excel`, `audio/x-wav` → `wav`).
pub fn extension_from_mime(mime: &str) -> String {
    let essence = mime.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
    if essence.is_empty() {
        return String::new();
    }
    if let Some((_, ext)) = MIME_EXTENSIONS.iter().find(|(m, _)| *m == essence) {
        return (*ext).to_string();
    }

    let mut parts = essence.split('/');
    let subtype = match (parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(subtype), None) => subtype.trim(),
        _ => return String::new(),
    };
    if subtype.is_empty() {
        return String::new();
    }

    let without_suffix = subtype.split('+').next().unwrap_or_default();
    let vendor_part = without_suffix.rsplit('.').next().unwrap_or_default();
    let dashed: Vec<&str> = match vendor_part.strip_prefix("x-") {
        Some(rest) => {
            let dashed: Vec<&str> = rest.split('-').collect();
            if dashed.len() > 1 {
                return sanitize_extension(dashed[0]);
            }
            dashed
        }
        None => vendor_part.split('-').collect(),
    };
    sanitize_extension(dashed.last().copied().unwrap_or_default())
}

/// Reconciles filename, final-URL, URL and MIME extension signals.
///
/// A MIME-derived extension wins when it disagrees with the filename (a
/// `.jpg` that is really WebP) or when it is the only signal. Otherwise the
/// order is filename, final URL, URL, MIME.
pub fn resolve_extension_from_download(item: &DownloadItem) -> String {
    let from_filename = sanitize_extension(extract_extension_from_name(&item.filename));
    let from_final_url = sanitize_extension(&extract_extension_from_url(&item.final_url));
    let from_url = sanitize_extension(&extract_extension_from_url(&item.url));
    let from_mime = extension_from_mime(&item.mime);

    if !from_mime.is_empty() {
        if !from_filename.is_empty() && from_mime != from_filename {
            return from_mime;
        }
        if from_filename.is_empty() && from_final_url.is_empty() && from_url.is_empty() {
            return from_mime;
        }
    }

    [from_filename, from_final_url, from_url, from_mime]
        .into_iter()
        .find(|ext| !ext.is_empty())
        .unwrap_or_default()
}
