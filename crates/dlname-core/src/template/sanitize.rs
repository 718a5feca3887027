//! Filesystem-safe filename sanitization.

/// Maximum length, in characters, of a rendered filename (including folders).
pub const FILENAME_MAX_CHARS: usize = 250;

/// Characters no path segment may contain on any desktop platform.
const FORBIDDEN: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Replaces every forbidden character in a single path segment with `_`.
pub fn sanitize_filename_part(part: &str) -> String {
    part.chars()
        .map(|c| if FORBIDDEN.contains(&c) { '_' } else { c })
        .collect()
}

/// Sanitizes a relative filename that may route into folders.
///
/// Each `/`-separated segment is sanitized on its own so intentional folder
/// separators survive. The result is capped at [`FILENAME_MAX_CHARS`].
pub fn sanitize_filename(name: &str) -> String {
    let joined = name
        .split('/')
        .map(sanitize_filename_part)
        .collect::<Vec<_>>()
        .join("/");

    match joined.char_indices().nth(FILENAME_MAX_CHARS) {
        Some((cut, _)) => joined[..cut].to_string(),
        None => joined,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_forbidden_characters() {
        assert_eq!(sanitize_filename("report<2024>|draft*"), "report_2024__draft_");
        assert_eq!(sanitize_filename("a:b\"c\\d?e"), "a_b_c_d_e");
    }

    #[test]
    fn keeps_folder_separators() {
        assert_eq!(sanitize_filename("folder/name<one>"), "folder/name_one_");
        assert_eq!(sanitize_filename("a/b/c.txt"), "a/b/c.txt");
    }

    #[test]
    fn truncates_to_limit() {
        assert_eq!(sanitize_filename(&"a".repeat(300)).len(), 250);
        let wide = "é".repeat(300);
        assert_eq!(sanitize_filename(&wide).chars().count(), 250);
        assert_eq!(sanitize_filename("short"), "short");
    }

    #[test]
    fn part_replaces_slash_too() {
        assert_eq!(sanitize_filename_part("a/b"), "a_b");
    }
}
