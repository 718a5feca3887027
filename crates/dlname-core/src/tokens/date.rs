//! Date and year tokens from local calendar fields.

use chrono::Datelike;

/// `YYYY-MM-DD`, zero-padded.
pub fn format_date<D: Datelike>(date: &D) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

pub fn format_year<D: Datelike>(date: &D) -> String {
    format!("{:04}", date.year())
}
