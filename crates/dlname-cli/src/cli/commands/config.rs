//! `dlname config` – inspect and edit settings.

use anyhow::{Context, Result};
use dlname_core::config::{self, Settings};
use dlname_core::template::{preview, sample_date, unknown_placeholders};
use std::path::Path;

use crate::cli::ConfigCommand;

/// Applies a settings edit. Returns false when nothing changed.
pub(crate) fn apply_edit(settings: &mut Settings, action: &ConfigCommand) -> bool {
    match action {
        ConfigCommand::Show | ConfigCommand::Path | ConfigCommand::Import { .. } => false,
        ConfigCommand::Reset => {
            *settings = Settings::default();
            true
        }
        ConfigCommand::SetPattern { pattern } => {
            settings.filename_pattern = pattern.trim().to_string();
            settings.migrate();
            true
        }
        ConfigCommand::SetMaxTitle { length } => {
            settings.max_title_length = *length;
            true
        }
        ConfigCommand::Enable => {
            settings.enabled = true;
            true
        }
        ConfigCommand::Disable => {
            settings.enabled = false;
            true
        }
        ConfigCommand::Block { domain } => {
            let domain = domain.trim();
            if domain.is_empty()
                || settings
                    .domain_blacklist
                    .iter()
                    .any(|d| d.eq_ignore_ascii_case(domain))
            {
                return false;
            }
            settings.domain_blacklist.push(domain.to_string());
            true
        }
        ConfigCommand::Unblock { domain } => {
            let before = settings.domain_blacklist.len();
            settings
                .domain_blacklist
                .retain(|d| !d.eq_ignore_ascii_case(domain.trim()));
            settings.domain_blacklist.len() != before
        }
    }
}

/// Reads settings exported as JSON (camelCase keys, `%token%` patterns
/// accepted) and migrates them.
pub(crate) fn import_settings(file: &Path) -> Result<Settings> {
    let data = std::fs::read_to_string(file)
        .with_context(|| format!("read settings export {}", file.display()))?;
    Settings::from_json(&data)
        .with_context(|| format!("parse settings export {}", file.display()))
}

pub fn run_config(path: &Path, action: ConfigCommand) -> Result<()> {
    match action {
        ConfigCommand::Path => {
            println!("{}", path.display());
            return Ok(());
        }
        ConfigCommand::Show => {
            let settings = config::load_or_init_at(path)?;
            print!("{}", toml::to_string_pretty(&settings).context("serialize settings")?);
            return Ok(());
        }
        _ => {}
    }

    let (settings, changed) = match &action {
        ConfigCommand::Reset => (Settings::default(), true),
        ConfigCommand::Import { file } => (import_settings(file)?, true),
        _ => {
            let mut settings = config::load_or_init_at(path)?;
            let changed = apply_edit(&mut settings, &action);
            (settings, changed)
        }
    };
    if changed {
        config::save_to(path, &settings)?;
        tracing::info!(?action, "settings updated at {}", path.display());
    } else {
        println!("No change.");
    }

    for unknown in unknown_placeholders(&settings.filename_pattern) {
        eprintln!("warning: unrecognized placeholder {unknown} is kept literally");
    }
    println!("Preview: {}", preview(&settings, sample_date()));
    Ok(())
}
