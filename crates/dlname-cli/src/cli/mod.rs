//! CLI for the dlname download renamer.

mod commands;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use dlname_core::config;
use std::path::PathBuf;

use commands::{run_completions, run_config, run_preview, run_render, run_watch};

/// Top-level CLI for the dlname download renamer.
#[derive(Debug, Parser)]
#[command(name = "dlname")]
#[command(about = "dlname: rename browser downloads from a filename template", long_about = None)]
pub struct Cli {
    /// Settings file to use instead of ~/.config/dlname/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Render the filename a single download would get.
    Render {
        #[command(flatten)]
        download: DownloadArgs,
        /// Use this pattern instead of the configured one.
        #[arg(long)]
        pattern: Option<String>,
        /// Date for the {date}/{year} tokens (YYYY-MM-DD, default today).
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },

    /// Preview the configured (or given) pattern on a sample page.
    Preview {
        /// Use this pattern instead of the configured one.
        #[arg(long)]
        pattern: Option<String>,
        /// Date for the {date}/{year} tokens (YYYY-MM-DD, default 2024-05-02).
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },

    /// Inspect or change settings.
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },

    /// Read download events as JSON lines on stdin and print rename decisions.
    Watch {
        /// JSON file with the open tabs (`[{"id":1,"url":"...","title":"..."}]`).
        #[arg(long, value_name = "PATH")]
        tabs: Option<PathBuf>,
    },

    /// Print shell completions.
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the current settings as TOML.
    Show,
    /// Print the settings file location.
    Path,
    /// Restore default settings.
    Reset,
    /// Set the filename pattern (`%name%` placeholders are converted).
    SetPattern { pattern: String },
    /// Set the title length limit (0 = no limit).
    SetMaxTitle { length: usize },
    /// Turn renaming on.
    Enable,
    /// Turn renaming off.
    Disable,
    /// Never rename downloads from this domain.
    Block { domain: String },
    /// Remove a domain from the blacklist.
    Unblock { domain: String },
    /// Replace settings with a JSON export of the extension's storage.
    Import { file: PathBuf },
}

/// Raw download fields, as the browser would report them.
#[derive(Debug, Clone, Default, Args)]
pub struct DownloadArgs {
    /// Download URL.
    #[arg(long, default_value = "")]
    pub url: String,
    /// URL after redirects.
    #[arg(long, default_value = "")]
    pub final_url: String,
    /// Filename suggested by the browser.
    #[arg(long, default_value = "")]
    pub filename: String,
    /// Response MIME type.
    #[arg(long, default_value = "")]
    pub mime: String,
    /// Page that started the download.
    #[arg(long, default_value = "")]
    pub referrer: String,
    /// Title of the originating tab.
    #[arg(long)]
    pub tab_title: Option<String>,
    /// URL of the originating tab.
    #[arg(long)]
    pub tab_url: Option<String>,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let config_path = match cli.config {
            Some(path) => path,
            None => config::config_path()?,
        };

        match cli.command {
            CliCommand::Render {
                download,
                pattern,
                date,
            } => {
                let settings = config::load_or_init_at(&config_path)?;
                run_render(&settings, &download, pattern, date)?;
            }
            CliCommand::Preview { pattern, date } => {
                let settings = config::load_or_init_at(&config_path)?;
                run_preview(&settings, pattern, date);
            }
            CliCommand::Config { action } => run_config(&config_path, action)?,
            CliCommand::Watch { tabs } => run_watch(&config_path, tabs.as_deref()).await?,
            CliCommand::Completions { shell } => run_completions(shell),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
