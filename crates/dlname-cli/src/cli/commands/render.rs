//! `dlname render` – show the filename one download would get.

use anyhow::Result;
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use dlname_core::config::Settings;
use dlname_core::pipeline::{decide, Decision};
use dlname_core::record::{DownloadItem, Tab};
use dlname_core::template::{build_filename, unknown_placeholders};
use dlname_core::tokens::RenderContext;

use crate::cli::DownloadArgs;

pub(crate) fn render_time(date: Option<NaiveDate>) -> NaiveDateTime {
    match date {
        Some(d) => NaiveDateTime::new(d, NaiveTime::MIN),
        None => Local::now().naive_local(),
    }
}

pub(crate) fn download_from_args(args: &DownloadArgs) -> (DownloadItem, Option<Tab>) {
    let item = DownloadItem {
        id: 0,
        filename: args.filename.clone(),
        url: args.url.clone(),
        final_url: args.final_url.clone(),
        referrer: args.referrer.clone(),
        tab_id: None,
        mime: args.mime.clone(),
    };
    let tab = match (&args.tab_title, &args.tab_url) {
        (None, None) => None,
        (title, url) => Some(Tab {
            id: None,
            url: url.clone().unwrap_or_default(),
            title: title.clone().unwrap_or_default(),
        }),
    };
    (item, tab)
}

pub fn run_render(
    settings: &Settings,
    args: &DownloadArgs,
    pattern: Option<String>,
    date: Option<NaiveDate>,
) -> Result<()> {
    let mut settings = settings.clone();
    if let Some(pattern) = pattern {
        settings.filename_pattern = pattern;
        settings.migrate();
    }
    for unknown in unknown_placeholders(&settings.filename_pattern) {
        eprintln!("warning: unrecognized placeholder {unknown} is kept literally");
    }

    let (item, tab) = download_from_args(args);
    let now = render_time(date);
    let ctx = RenderContext::from_download(&item, tab.as_ref(), &settings, now);
    tracing::debug!(?ctx, "render context");
    println!("{}", build_filename(&ctx, &settings));

    if let Decision::Keep(reason) = decide(&item, tab.as_ref(), &settings, now) {
        eprintln!("note: the pipeline would keep the original name ({reason:?})");
    }
    Ok(())
}
