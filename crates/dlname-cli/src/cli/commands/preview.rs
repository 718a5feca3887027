//! `dlname preview` – render the pattern against a sample page.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use dlname_core::config::Settings;
use dlname_core::template::{preview, sample_date, unknown_placeholders};

pub fn run_preview(settings: &Settings, pattern: Option<String>, date: Option<NaiveDate>) {
    let mut settings = settings.clone();
    if let Some(pattern) = pattern {
        settings.filename_pattern = pattern;
        settings.migrate();
    }
    for unknown in unknown_placeholders(&settings.filename_pattern) {
        eprintln!("warning: unrecognized placeholder {unknown} is kept literally");
    }
    let date = date
        .map(|d| NaiveDateTime::new(d, NaiveTime::MIN))
        .unwrap_or_else(sample_date);
    println!("{}", preview(&settings, date));
}
