//! Basename and extension extraction from paths, filenames and URLs.

/// Returns the substring after the final `/`, or the whole string if there is none.
pub fn extract_basename(path: &str) -> &str {
    path.rsplit_once('/').map_or(path, |(_, base)| base)
}

/// Removes a trailing `.ext` suffix (one or more chars, no `.` or `/`).
///
/// A name that is only a dot-suffix (`.bashrc`) strips to empty; a bare
/// trailing dot (`name.`) is left alone.
pub fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx + 1 < name.len() && !name[idx + 1..].contains('/') => &name[..idx],
        _ => name,
    }
}

/// Extension of the basename of `name`, without the dot.
///
/// The final `.` must be neither the first nor the last character of the
/// basename, otherwise the result is empty.
pub fn extract_extension_from_name(name: &str) -> &str {
    let base = extract_basename(name);
    match base.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < base.len() => &base[idx + 1..],
        _ => "",
    }
}

/// Extension of the last segment of an absolute URL's path; empty when the
/// URL does not parse.
pub fn extract_extension_from_url(url: &str) -> String {
    if url.is_empty() {
        return String::new();
    }
    match url::Url::parse(url) {
        Ok(parsed) => extract_extension_from_name(parsed.path()).to_string(),
        Err(_) => String::new(),
    }
}

/// Strips every character outside `[A-Za-z0-9]`.
pub fn sanitize_extension(ext: &str) -> String {
    ext.chars().filter(char::is_ascii_alphanumeric).collect()
}
