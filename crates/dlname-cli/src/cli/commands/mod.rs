//! CLI command handlers, one file per command.

mod completions;
mod config;
mod preview;
mod render;
mod watch;

pub use completions::run_completions;
pub use config::run_config;
pub use preview::run_preview;
pub use render::run_render;
pub use watch::run_watch;

#[cfg(test)]
pub(crate) use config::{apply_edit, import_settings};
#[cfg(test)]
pub(crate) use render::{download_from_args, render_time};
#[cfg(test)]
pub(crate) use watch::{parse_event, settle, Verdict};
