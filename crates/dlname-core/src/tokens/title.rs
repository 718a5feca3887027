//! Title token: sanitization and source resolution.

use super::path::{extract_basename, strip_extension};

/// Title used when every source sanitizes to empty.
pub const DEFAULT_TITLE: &str = "download";

/// Candidate title sources, highest confidence first.
#[derive(Debug, Clone, Copy, Default)]
pub struct TitleSources<'a> {
    /// Page title of the originating tab.
    pub tab_title: &'a str,
    /// Source URL of the download (final URL, else URL).
    pub url: &'a str,
    /// Filename suggested by the host.
    pub filename: &'a str,
}

fn is_title_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
}

/// Reduces a title to `[A-Za-z0-9._-]` with single underscores as separators.
///
/// Runs of other characters become one `_`, repeated underscores collapse,
/// and edge underscores are stripped. A positive `max_length` truncates the
/// result and strips any edge underscore the cut exposes.
pub fn sanitize_title(title: &str, max_length: usize) -> String {
    let mut out = String::with_capacity(title.len());
    let mut prev_underscore = false;

    for c in title.trim().chars() {
        let c = if is_title_char(c) { c } else { '_' };
        if c == '_' {
            if !prev_underscore {
                out.push('_');
            }
            prev_underscore = true;
        } else {
            out.push(c);
            prev_underscore = false;
        }
    }

    let collapsed = out.trim_matches('_');
    if max_length == 0 || collapsed.len() <= max_length {
        return collapsed.to_string();
    }
    // Output is pure ASCII, so byte and char indices coincide.
    collapsed[..max_length].trim_matches('_').to_string()
}

fn title_from_name(name: &str, max_length: usize) -> String {
    let base = extract_basename(name);
    if base.is_empty() {
        return String::new();
    }
    sanitize_title(strip_extension(base), max_length)
}

/// Picks the first source that sanitizes to something non-empty.
///
/// Order: tab title, URL basename without extension, filename basename
/// without extension. Falls back to [`DEFAULT_TITLE`].
pub fn resolve_download_title(sources: TitleSources<'_>, max_length: usize) -> String {
    let from_tab = sanitize_title(sources.tab_title, max_length);
    if !from_tab.is_empty() {
        return from_tab;
    }

    // The raw URL string: a query survives in the basename and a bare host
    // yields its own name.
    let from_url = title_from_name(sources.url, max_length);
    if !from_url.is_empty() {
        return from_url;
    }

    let from_filename = title_from_name(sources.filename, max_length);
    if !from_filename.is_empty() {
        return from_filename;
    }

    DEFAULT_TITLE.to_string()
}
