//! Batch cleaning of tabular datasets.
//!
//! Reads a CSV, TSV or JSON-lines dataset, cleans one text column with a
//! [`Pipeline`] and writes the same rows back with the cleaned text in an
//! output column. Row order and row count are preserved. A missing input
//! column is the only content-level failure; individual cells never fail.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};
use tempfile::NamedTempFile;

use crate::error::BatchError;
use crate::pipeline::{PiiRedactor, Pipeline};

/// Default name of the column holding raw text.
pub const DEFAULT_INPUT_COLUMN: &str = "raw_text";

/// Default name of the column receiving cleaned text.
pub const DEFAULT_OUTPUT_COLUMN: &str = "clean_text";

/// Emit a progress event every this many rows.
const PROGRESS_INTERVAL: usize = 10_000;

/// Dataset encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchFormat {
    /// Comma-separated values with a header row.
    #[default]
    Csv,
    /// Tab-separated values with a header row.
    Tsv,
    /// One JSON object per line.
    JsonLines,
}

impl BatchFormat {
    /// Guess the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "tsv" | "tab" => Some(Self::Tsv),
            "jsonl" | "ndjson" => Some(Self::JsonLines),
            _ => None,
        }
    }

    fn delimiter(&self) -> Option<u8> {
        match self {
            Self::Csv => Some(b','),
            Self::Tsv => Some(b'\t'),
            Self::JsonLines => None,
        }
    }
}

impl std::str::FromStr for BatchFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(BatchFormat::Csv),
            "tsv" => Ok(BatchFormat::Tsv),
            "jsonl" | "ndjson" | "json_lines" => Ok(BatchFormat::JsonLines),
            _ => Err(format!(
                "invalid batch format '{}', expected 'csv', 'tsv' or 'jsonl'",
                s
            )),
        }
    }
}

/// What to read, what to write, and how.
#[derive(Debug, Clone)]
pub struct BatchJob {
    /// Column holding raw text.
    pub input_column: String,
    /// Column receiving cleaned text (appended, or overwritten if present).
    pub output_column: String,
    /// Dataset encoding.
    pub format: BatchFormat,
    /// Number of leading rows to keep as before/after samples.
    pub preview: usize,
}

impl BatchJob {
    /// Job with the default `raw_text` -> `clean_text` columns.
    pub fn new(format: BatchFormat) -> Self {
        Self {
            input_column: DEFAULT_INPUT_COLUMN.to_string(),
            output_column: DEFAULT_OUTPUT_COLUMN.to_string(),
            format,
            preview: 0,
        }
    }

    /// Set the input and output column names.
    pub fn with_columns(mut self, input: impl Into<String>, output: impl Into<String>) -> Self {
        self.input_column = input.into();
        self.output_column = output.into();
        self
    }

    /// Keep the first `rows` before/after pairs in the summary.
    pub fn with_preview(mut self, rows: usize) -> Self {
        self.preview = rows;
        self
    }
}

/// A before/after sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewRow {
    pub raw: String,
    pub clean: String,
}

/// Statistics for a finished batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchSummary {
    /// Rows processed.
    pub rows: usize,
    /// Rows whose cleaned text contains at least one sentinel.
    pub redacted_rows: usize,
    /// Rows whose cleaned text is empty.
    pub empty_rows: usize,
    /// Sentinel occurrences per PII label.
    pub sentinels: BTreeMap<String, usize>,
    /// Leading before/after samples. Holds raw text, so never serialized.
    #[serde(skip)]
    pub preview: Vec<PreviewRow>,
}

impl BatchSummary {
    fn record(&mut self, redactor: &PiiRedactor, raw: Option<&str>, clean: &str, preview_limit: usize) {
        self.rows += 1;

        let mut redacted = false;
        for (label, count) in redactor.count_sentinels(clean) {
            *self.sentinels.entry(label.to_string()).or_default() += count;
            redacted |= count > 0;
        }
        if redacted {
            self.redacted_rows += 1;
        }
        if clean.is_empty() {
            self.empty_rows += 1;
        }

        if self.preview.len() < preview_limit {
            self.preview.push(PreviewRow {
                raw: raw.unwrap_or_default().to_string(),
                clean: clean.to_string(),
            });
        }

        if self.rows % PROGRESS_INTERVAL == 0 {
            tracing::debug!(rows = self.rows, "Batch progress");
        }
    }
}

/// Clean a dataset from `reader` into `writer`.
pub fn run<R: Read, W: Write>(
    pipeline: &Pipeline,
    job: &BatchJob,
    reader: R,
    writer: W,
) -> Result<BatchSummary, BatchError> {
    let summary = match job.format.delimiter() {
        Some(delimiter) => run_delimited(pipeline, job, delimiter, reader, writer)?,
        None => run_json_lines(pipeline, job, reader, writer)?,
    };

    tracing::info!(
        rows = summary.rows,
        redacted_rows = summary.redacted_rows,
        empty_rows = summary.empty_rows,
        "Batch cleaning complete"
    );
    Ok(summary)
}

/// Clean a dataset file into another file, creating parent directories.
///
/// Rows are written to a temporary file next to `output`, which replaces
/// `output` only once the whole batch succeeded. On failure `output` is left
/// untouched, and `input` and `output` may name the same file.
pub fn run_files(
    pipeline: &Pipeline,
    job: &BatchJob,
    input: &Path,
    output: &Path,
) -> Result<BatchSummary, BatchError> {
    let reader = File::open(input)?;

    let dir = match output.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            std::fs::create_dir_all(parent)?;
            parent
        }
        None => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(dir)?;

    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        format = ?job.format,
        "Cleaning dataset"
    );
    let summary = run(pipeline, job, reader, BufWriter::new(staged.as_file_mut()))?;

    staged.persist(output).map_err(|e| BatchError::Io(e.error))?;
    Ok(summary)
}

fn run_delimited<R: Read, W: Write>(
    pipeline: &Pipeline,
    job: &BatchJob,
    delimiter: u8,
    reader: R,
    writer: W,
) -> Result<BatchSummary, BatchError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut headers = rdr.headers()?.clone();
    let input_width = headers.len();

    let input_idx = headers
        .iter()
        .position(|h| h == job.input_column)
        .ok_or_else(|| BatchError::MissingColumn {
            column: job.input_column.clone(),
            available: headers.iter().map(String::from).collect(),
        })?;

    let output_idx = match headers.iter().position(|h| h == job.output_column) {
        Some(idx) => idx,
        None => {
            headers.push_field(&job.output_column);
            headers.len() - 1
        }
    };
    let width = headers.len();

    let mut wtr = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);
    wtr.write_record(&headers)?;

    let mut summary = BatchSummary::default();
    for result in rdr.records() {
        let record = result?;
        if record.len() > input_width {
            return Err(BatchError::RaggedRow {
                line: record.position().map_or(0, |p| p.line()),
                expected: input_width,
                found: record.len(),
            });
        }

        let raw = record.get(input_idx);
        let clean = pipeline.clean_value(raw);

        // Short rows are padded with empty cells.
        let mut row: Vec<&str> = record.iter().collect();
        row.resize(width, "");
        row[output_idx] = &clean;
        wtr.write_record(&row)?;

        summary.record(pipeline.redactor(), raw, &clean, job.preview);
    }

    wtr.flush()?;
    Ok(summary)
}

fn run_json_lines<R: Read, W: Write>(
    pipeline: &Pipeline,
    job: &BatchJob,
    reader: R,
    mut writer: W,
) -> Result<BatchSummary, BatchError> {
    let mut rows: Vec<(usize, Map<String, Value>)> = Vec::new();

    for (idx, line) in BufReader::new(reader).lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }

        let value: Value = serde_json::from_str(&line).map_err(|source| BatchError::Json {
            line: line_no,
            source,
        })?;
        match value {
            Value::Object(map) => rows.push((line_no, map)),
            other => {
                return Err(BatchError::InvalidRecord {
                    line: line_no,
                    found: json_type_name(&other),
                });
            }
        }
    }

    if !rows.is_empty() && !rows.iter().any(|(_, row)| row.contains_key(&job.input_column)) {
        return Err(BatchError::MissingColumn {
            column: job.input_column.clone(),
            available: rows[0].1.keys().cloned().collect(),
        });
    }

    let mut summary = BatchSummary::default();
    for (line_no, mut row) in rows {
        let raw = row.get(&job.input_column).unwrap_or(&Value::Null);
        let clean = pipeline.clean_json(raw);
        summary.record(pipeline.redactor(), raw.as_str(), &clean, job.preview);

        row.insert(job.output_column.clone(), Value::String(clean));
        serde_json::to_writer(&mut writer, &row).map_err(|source| BatchError::Json {
            line: line_no,
            source,
        })?;
        writer.write_all(b"\n")?;
    }

    writer.flush()?;
    Ok(summary)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
