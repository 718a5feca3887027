//! Template rendering.
//!
//! Substitutes sanitized tokens into the user's filename pattern and
//! guarantees a legal, non-empty, deterministic result: if the rendered name
//! is unusable, a fixed `{domain}_{title}_{date}[.{ext}]` fallback is
//! synthesized instead.

mod placeholder;
mod sanitize;

use chrono::{NaiveDate, NaiveDateTime};

use crate::config::Settings;
use crate::tokens::{
    format_date, format_year, sanitize_domain, sanitize_extension, sanitize_title,
    strip_extension, RenderContext, DEFAULT_TITLE,
};

pub use placeholder::{is_legacy_pattern, migrate_legacy_pattern, unknown_placeholders, Placeholder};
pub use sanitize::{sanitize_filename, sanitize_filename_part, FILENAME_MAX_CHARS};

/// Domain token when the hostname is missing or unparseable.
pub const UNKNOWN_DOMAIN: &str = "unknown-domain";

/// Sanitized tokens ready for substitution. Only `ext` may be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSet {
    pub domain: String,
    pub title: String,
    pub date: String,
    pub year: String,
    pub ext: String,
    pub original_name: String,
}

impl TokenSet {
    pub fn from_context(ctx: &RenderContext, settings: &Settings) -> Self {
        let domain = non_empty_or(sanitize_domain(&ctx.domain, settings.remove_www), UNKNOWN_DOMAIN);
        let title = non_empty_or(
            sanitize_title(&ctx.title, settings.max_title_length),
            DEFAULT_TITLE,
        );
        let original_name = non_empty_or(
            sanitize_filename_part(strip_extension(&ctx.original_name)),
            &title,
        );

        Self {
            domain,
            title,
            date: format_date(&ctx.date),
            year: format_year(&ctx.date),
            ext: sanitize_extension(&ctx.ext),
            original_name,
        }
    }

    pub fn get(&self, placeholder: Placeholder) -> &str {
        match placeholder {
            Placeholder::Domain => &self.domain,
            Placeholder::Title => &self.title,
            Placeholder::Date => &self.date,
            Placeholder::Year => &self.year,
            Placeholder::Ext => &self.ext,
            Placeholder::OriginalName => &self.original_name,
        }
    }

    /// `{domain}_{title}_{date}` plus `.{ext}` when there is an extension.
    pub fn fallback_name(&self) -> String {
        if self.ext.is_empty() {
            format!("{}_{}_{}", self.domain, self.title, self.date)
        } else {
            format!("{}_{}_{}.{}", self.domain, self.title, self.date, self.ext)
        }
    }
}

fn non_empty_or(value: String, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value
    }
}

fn has_alphanumeric(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_alphanumeric())
}

/// Renders `pattern` with `tokens` and sanitizes the result.
pub fn render(pattern: &str, tokens: &TokenSet) -> String {
    let rendered = if tokens.ext.is_empty() {
        let ext_suffix = format!(".{}", Placeholder::Ext.tag());
        placeholder::apply_pattern(&pattern.replace(&ext_suffix, ""), tokens)
    } else {
        placeholder::apply_pattern(pattern, tokens)
    };

    let sanitized = sanitize_filename(&rendered);
    if !has_alphanumeric(&sanitized) {
        tracing::debug!(pattern, rendered = %rendered, "pattern rendered unusable name; using fallback");
        return sanitize_filename(&tokens.fallback_name());
    }

    if tokens.ext.is_empty() {
        sanitized.trim_end_matches('.').to_string()
    } else {
        sanitized
    }
}

/// Builds the final filename for one download.
pub fn build_filename(ctx: &RenderContext, settings: &Settings) -> String {
    let tokens = TokenSet::from_context(ctx, settings);
    render(&settings.filename_pattern, &tokens)
}

/// Renders the pattern against a fixed sample page, for previews.
pub fn preview(settings: &Settings, date: NaiveDateTime) -> String {
    let domain = if settings.remove_www {
        "example.com"
    } else {
        "www.example.com"
    };
    let ctx = RenderContext {
        domain: domain.to_string(),
        title: "Sample Page".to_string(),
        ext: "pdf".to_string(),
        date,
        original_name: "sample-page.pdf".to_string(),
    };
    build_filename(&ctx, settings)
}

/// Noon on 2024-05-02, the date previews use unless told otherwise.
pub fn sample_date() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 2)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(pattern: &str) -> Settings {
        Settings {
            filename_pattern: pattern.to_string(),
            max_title_length: 20,
            remove_www: true,
            ..Settings::default()
        }
    }

    fn ctx(domain: &str, title: &str, ext: &str, original_name: &str) -> RenderContext {
        RenderContext {
            domain: domain.to_string(),
            title: title.to_string(),
            ext: ext.to_string(),
            date: sample_date(),
            original_name: original_name.to_string(),
        }
    }

    const PATTERN: &str = "{domain}_{title}_{date}.{ext}";

    #[test]
    fn renders_default_shape() {
        let c = ctx("example.com", "Hello, world! This is a test.", "pdf", "My Document");
        assert_eq!(
            build_filename(&c, &settings(PATTERN)),
            "example.com_Hello_world_This_is_2024-05-02.pdf"
        );
    }

    #[test]
    fn empty_extension_drops_dot_ext() {
        let c = ctx("example.com", "Plain Title", "", "Plain Title");
        assert_eq!(
            build_filename(&c, &settings(PATTERN)),
            "example.com_Plain_Title_2024-05-02"
        );
    }

    #[test]
    fn empty_domain_and_punctuation_title_use_placeholders() {
        let c = ctx("", "***", "txt", "download.txt");
        assert_eq!(
            build_filename(&c, &settings(PATTERN)),
            "unknown-domain_download_2024-05-02.txt"
        );
    }

    #[test]
    fn folder_routing_with_year() {
        let c = ctx("example.com", "Hello, world! This is a test.", "pdf", "My Document");
        assert_eq!(
            build_filename(&c, &settings("{domain}/{year}/{title}.{ext}")),
            "example.com/2024/Hello_world_This_is.pdf"
        );
    }

    #[test]
    fn original_name_keeps_spaces_and_strips_extension() {
        let c = ctx("example.com", "Hello", "jpg", "Photo 1.jpg");
        assert_eq!(
            build_filename(&c, &settings("{original_name}_{date}.{ext}")),
            "Photo 1_2024-05-02.jpg"
        );
    }

    #[test]
    fn original_name_falls_back_to_title() {
        let c = ctx("example.com", "Some Title", "pdf", "");
        assert_eq!(
            build_filename(&c, &settings("{original_name}.{ext}")),
            "Some_Title.pdf"
        );
        let forbidden = ctx("example.com", "T", "", "a:b?.txt");
        assert_eq!(build_filename(&forbidden, &settings("{original_name}")), "a_b_");
    }

    #[test]
    fn unusable_pattern_uses_fallback() {
        let c = ctx("www.example.com", "Report", "pdf", "");
        assert_eq!(
            build_filename(&c, &settings("???")),
            "example.com_Report_2024-05-02.pdf"
        );
        assert_eq!(
            build_filename(&c, &settings("")),
            "example.com_Report_2024-05-02.pdf"
        );
        let no_ext = ctx("example.com", "Report", "", "");
        assert_eq!(
            build_filename(&no_ext, &settings("-_-")),
            "example.com_Report_2024-05-02"
        );
    }

    #[test]
    fn hard_coded_dot_is_stripped_without_extension() {
        let c = ctx("example.com", "Notes", "", "");
        assert_eq!(build_filename(&c, &settings("{title}..")), "Notes");
        assert_eq!(build_filename(&c, &settings("{title}.{ext}.")), "Notes");
    }

    #[test]
    fn every_placeholder_once_keeps_order() {
        let c = ctx("Example.com", "A Title", "zip", "orig.zip");
        let tokens = TokenSet::from_context(&c, &settings(""));
        let out = build_filename(
            &c,
            &settings("{ext}-{year}-{original_name}-{date}-{title}-{domain}"),
        );
        assert_eq!(out, "zip-2024-orig-2024-05-02-A_Title-example.com");
        let positions: Vec<usize> = [
            &tokens.ext,
            &tokens.year,
            &tokens.original_name,
            &tokens.date,
            &tokens.title,
            &tokens.domain,
        ]
        .iter()
        .map(|v| out.find(v.as_str()).unwrap())
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn rendering_is_deterministic() {
        let c = ctx("example.com", "Same", "pdf", "same.pdf");
        let s = settings(PATTERN);
        assert_eq!(build_filename(&c, &s), build_filename(&c.clone(), &s.clone()));
    }

    #[test]
    fn forbidden_characters_in_literal_text_are_replaced() {
        let c = ctx("example.com", "T", "pdf", "");
        assert_eq!(
            build_filename(&c, &settings("{domain}: <{title}>.{ext}")),
            "example.com_ _T_.pdf"
        );
    }

    #[test]
    fn long_output_is_capped() {
        let c = ctx("example.com", &"x".repeat(400), "pdf", "");
        let s = Settings {
            max_title_length: 0,
            ..settings(PATTERN)
        };
        assert_eq!(build_filename(&c, &s).chars().count(), FILENAME_MAX_CHARS);
    }

    #[test]
    fn preview_reflects_remove_www() {
        let mut s = Settings::default();
        assert_eq!(
            preview(&s, sample_date()),
            "example.com_Sample_Page_2024-05-02.pdf"
        );
        s.remove_www = false;
        assert_eq!(
            preview(&s, sample_date()),
            "www.example.com_Sample_Page_2024-05-02.pdf"
        );
    }
}
