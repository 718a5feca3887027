//! Tests for render and preview.

use super::parse;
use crate::cli::commands::{download_from_args, render_time};
use crate::cli::{Cli, CliCommand};
use chrono::NaiveDate;
use clap::Parser;
use dlname_core::config::Settings;
use dlname_core::template::build_filename;
use dlname_core::tokens::RenderContext;

#[test]
fn cli_parse_render() {
    match parse(&[
        "dlname",
        "render",
        "--url",
        "https://example.com/files/report.pdf",
        "--mime",
        "application/pdf",
        "--tab-title",
        "Quarterly Report",
        "--date",
        "2024-05-02",
    ]) {
        CliCommand::Render {
            download,
            pattern,
            date,
        } => {
            assert_eq!(download.url, "https://example.com/files/report.pdf");
            assert_eq!(download.mime, "application/pdf");
            assert_eq!(download.tab_title.as_deref(), Some("Quarterly Report"));
            assert!(download.tab_url.is_none());
            assert!(download.filename.is_empty());
            assert!(pattern.is_none());
            assert_eq!(date, NaiveDate::from_ymd_opt(2024, 5, 2));
        }
        _ => panic!("expected Render"),
    }
}

#[test]
fn cli_parse_render_rejects_bad_date() {
    assert!(Cli::try_parse_from(["dlname", "render", "--date", "02/05/2024"]).is_err());
}

#[test]
fn render_args_build_expected_name() {
    let cli = Cli::try_parse_from([
        "dlname",
        "render",
        "--url",
        "https://www.example.com/files/report.pdf",
        "--tab-title",
        "Hello, world! This is a test.",
        "--date",
        "2024-05-02",
    ])
    .unwrap();
    let CliCommand::Render { download, date, .. } = cli.command else {
        panic!("expected Render");
    };
    let (item, tab) = download_from_args(&download);
    let settings = Settings {
        max_title_length: 20,
        ..Settings::default()
    };
    let ctx = RenderContext::from_download(&item, tab.as_ref(), &settings, render_time(date));
    assert_eq!(
        build_filename(&ctx, &settings),
        "example.com_Hello_world_This_is_2024-05-02.pdf"
    );
}

#[test]
fn cli_parse_preview_with_pattern() {
    match parse(&["dlname", "preview", "--pattern", "{domain}/{year}/{title}.{ext}"]) {
        CliCommand::Preview { pattern, date } => {
            assert_eq!(pattern.as_deref(), Some("{domain}/{year}/{title}.{ext}"));
            assert!(date.is_none());
        }
        _ => panic!("expected Preview"),
    }
}

#[test]
fn cli_parse_global_config() {
    let cli = Cli::try_parse_from(["dlname", "preview", "--config", "/tmp/dl.toml"]).unwrap();
    assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("/tmp/dl.toml")));
}
