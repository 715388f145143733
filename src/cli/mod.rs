//! Command-line interface.
//!
//! Subcommands:
//! - `clean`: clean text given as arguments or piped on stdin
//! - `batch`: clean one column of a CSV/TSV/JSON-lines dataset
//! - `repl`: interactive tester
//! - `dict`: inspect the slang dictionary

mod dictionary;

pub use dictionary::{DictionaryCommand, run_dictionary_command};

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::batch::{self, BatchFormat, BatchJob};
use crate::config::Config;
use crate::dictionary::SlangDictionary;
use crate::pipeline::{Pipeline, SentinelStyle};

#[derive(Parser, Debug)]
#[command(
    name = "securedata",
    version,
    about = "Redact PII and normalize slang in Indonesian free-form text"
)]
pub struct Cli {
    /// Slang dictionary file (`key : value` per line)
    #[arg(long, global = true)]
    pub dictionary: Option<PathBuf>,

    /// Render sentinels with glyphs, e.g. 📧[EMAIL_SENSOR]
    #[arg(long, global = true)]
    pub decorate: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Clean text given as arguments, or each line of stdin
    Clean {
        /// Text to clean (joined with spaces)
        text: Vec<String>,
    },

    /// Clean a dataset column and write the result to a new file
    Batch(BatchArgs),

    /// Interactive tester: type a line, see it cleaned
    Repl,

    /// Inspect the slang dictionary
    #[command(subcommand)]
    Dict(DictionaryCommand),
}

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Input dataset
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output dataset
    #[arg(short, long)]
    pub output: PathBuf,

    /// Column holding raw text [default: raw_text]
    #[arg(long)]
    pub column: Option<String>,

    /// Column receiving cleaned text [default: clean_text]
    #[arg(long)]
    pub output_column: Option<String>,

    /// Dataset format (csv, tsv, jsonl); guessed from the input extension
    #[arg(long)]
    pub format: Option<BatchFormat>,

    /// Print the first N rows before and after cleaning
    #[arg(long, default_value_t = 0)]
    pub preview: usize,

    /// Write a JSON summary (counts only, no text) to this file
    #[arg(long)]
    pub report: Option<PathBuf>,
}

impl Cli {
    /// Apply command-line overrides on top of environment configuration.
    pub fn resolve_config(&self, mut config: Config) -> anyhow::Result<Config> {
        if let Some(path) = &self.dictionary {
            config.dictionary_path = path.clone();
        }
        if self.decorate {
            config.sentinel_style = SentinelStyle::Decorated;
        }
        if self.json_logs {
            config.log_json = true;
        }
        if let Command::Batch(args) = &self.command {
            if let Some(column) = &args.column {
                config.input_column = column.clone();
            }
            if let Some(column) = &args.output_column {
                config.output_column = column.clone();
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Dispatch to the selected subcommand.
    pub fn run(self, config: Config) -> anyhow::Result<()> {
        match self.command {
            Command::Clean { text } => run_clean(&config, text),
            Command::Batch(args) => run_batch(&config, args),
            Command::Repl => run_repl(&config),
            Command::Dict(cmd) => run_dictionary_command(cmd, &config.dictionary_path),
        }
    }
}

/// Load the dictionary and assemble the pipeline.
///
/// A missing dictionary only logs a warning.
pub fn build_pipeline(config: &Config) -> anyhow::Result<Pipeline> {
    let report = SlangDictionary::load(&config.dictionary_path)?;
    let pipeline = Pipeline::new(report.dictionary, config.sentinel_style)?;
    Ok(pipeline)
}

fn run_clean(config: &Config, text: Vec<String>) -> anyhow::Result<()> {
    let pipeline = build_pipeline(config)?;

    if !text.is_empty() {
        println!("{}", pipeline.clean(&text.join(" ")));
        return Ok(());
    }

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        writeln!(stdout, "{}", pipeline.clean(&line))?;
    }
    Ok(())
}

fn run_batch(config: &Config, args: BatchArgs) -> anyhow::Result<()> {
    let pipeline = build_pipeline(config)?;

    let format = args
        .format
        .or_else(|| BatchFormat::from_path(&args.input))
        .unwrap_or_default();
    let job = BatchJob::new(format)
        .with_columns(&config.input_column, &config.output_column)
        .with_preview(args.preview);

    let summary = batch::run_files(&pipeline, &job, &args.input, &args.output)
        .with_context(|| format!("cleaning {}", args.input.display()))?;

    for row in &summary.preview {
        println!("Raw   : {}", row.raw);
        println!("Clean : {}", row.clean);
        println!("{}", "-".repeat(50));
    }

    println!(
        "Cleaned {} rows ({} with redacted PII) -> {}",
        summary.rows,
        summary.redacted_rows,
        args.output.display()
    );

    if let Some(path) = &args.report {
        let json = serde_json::to_string_pretty(&summary)?;
        std::fs::write(path, json)
            .with_context(|| format!("writing report {}", path.display()))?;
    }

    Ok(())
}

fn run_repl(config: &Config) -> anyhow::Result<()> {
    let pipeline = build_pipeline(config)?;
    let mut editor = DefaultEditor::new()?;

    println!(
        "Loaded {} slang entries. Type text to clean, Ctrl-D to quit.",
        pipeline.dictionary().len()
    );

    loop {
        match editor.readline("securedata> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                editor.add_history_entry(line.as_str())?;

                println!("Original: {}", line);
                println!("Cleaned : {}", pipeline.clean(&line));
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
