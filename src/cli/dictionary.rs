//! Slang dictionary CLI commands.
//!
//! Commands for viewing the dictionary the pipeline normalizes with.

use std::path::Path;

use clap::Subcommand;

use crate::dictionary::{LoadReport, SlangDictionary};

#[derive(Subcommand, Debug, Clone)]
pub enum DictionaryCommand {
    /// List all entries and their replacements
    List {
        /// Show only entries whose key starts with this prefix (e.g., "gk", "tp")
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Look up the replacement for a single token
    Get {
        /// Informal token (e.g., "blm")
        key: String,
    },

    /// Show load statistics (entries, skipped lines, overwritten keys)
    Stats,

    /// Show the dictionary file path
    Path,
}

/// Run a dictionary command against the file at `path`.
pub fn run_dictionary_command(cmd: DictionaryCommand, path: &Path) -> anyhow::Result<()> {
    match cmd {
        DictionaryCommand::List { filter } => list_entries(path, filter),
        DictionaryCommand::Get { key } => get_entry(path, &key),
        DictionaryCommand::Stats => show_stats(path),
        DictionaryCommand::Path => show_path(path),
    }
}

/// List all entries.
fn list_entries(path: &Path, filter: Option<String>) -> anyhow::Result<()> {
    let report = SlangDictionary::load(path)?;
    let filter = filter.map(|f| f.to_lowercase());

    let entries: Vec<(&str, &str)> = report
        .dictionary
        .entries()
        .into_iter()
        .filter(|(key, _)| filter.as_deref().is_none_or(|f| key.starts_with(f)))
        .collect();

    // Find the longest key for alignment
    let max_key_len = entries.iter().map(|(k, _)| k.len()).max().unwrap_or(0);

    println!("Slang entries ({}):", entries.len());
    println!();

    for (key, value) in entries {
        println!("  {:width$}  {}", key, display_value(value), width = max_key_len);
    }

    Ok(())
}

/// Look up one token.
fn get_entry(path: &Path, key: &str) -> anyhow::Result<()> {
    let report = SlangDictionary::load(path)?;
    let key = key.trim().to_lowercase();

    match report.dictionary.get(&key) {
        Some(value) => {
            println!("{}", display_value(value));
            Ok(())
        }
        None => {
            anyhow::bail!("Token not in dictionary: {}", key);
        }
    }
}

/// Print load statistics.
fn show_stats(path: &Path) -> anyhow::Result<()> {
    let report = SlangDictionary::load(path)?;
    print!("{}", format_stats(&report));
    Ok(())
}

fn format_stats(report: &LoadReport) -> String {
    if let Some(warning) = &report.warning {
        return format!("{}\n  (normalization disabled)\n", warning);
    }

    let deletions = report
        .dictionary
        .entries()
        .iter()
        .filter(|(_, v)| v.is_empty())
        .count();

    format!(
        "Entries:     {}\nDeletions:   {}\nAccepted:    {}\nSkipped:     {}\nOverwritten: {}\n",
        report.dictionary.len(),
        deletions,
        report.accepted,
        report.skipped,
        report.overwritten
    )
}

/// Show the dictionary file path.
fn show_path(path: &Path) -> anyhow::Result<()> {
    println!("{}", path.display());

    if path.exists() {
        let metadata = std::fs::metadata(path)?;
        println!("  Size: {} bytes", metadata.len());
    } else {
        println!("  (does not exist, normalization disabled)");
    }

    Ok(())
}

/// Truncate long values and make deletions visible.
fn display_value(value: &str) -> String {
    if value.is_empty() {
        return "(deleted)".to_string();
    }
    if value.chars().count() > 60 {
        let head: String = value.chars().take(57).collect();
        format!("{}...", head)
    } else {
        value.to_string()
    }
}
