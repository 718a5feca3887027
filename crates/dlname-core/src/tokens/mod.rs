//! Token extraction.
//!
//! Turns raw, site-controlled strings (tab titles, URLs, filenames, MIME
//! types) into template-ready tokens. Every function here is pure and never
//! fails: malformed input degrades to an empty string.

mod context;
mod date;
mod domain;
mod mime;
mod path;
mod referrer;
mod title;

pub use context::RenderContext;
pub use date::{format_date, format_year};
pub use domain::{domain_source, extract_hostname, is_blacklisted, sanitize_domain};
pub use mime::{extension_from_mime, resolve_extension_from_download};
pub use path::{
    extract_basename, extract_extension_from_name, extract_extension_from_url,
    sanitize_extension, strip_extension,
};
pub use referrer::{build_referrer_pattern, pick_tab_by_referrer, TabFallback};
pub use title::{resolve_download_title, sanitize_title, TitleSources, DEFAULT_TITLE};
