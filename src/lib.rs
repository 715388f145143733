//! PII redaction and slang normalization for Indonesian free-form text.
//!
//! ```text
//! raw text ─► lowercase ─► redact PII ─► sanitize ─► normalize slang ─► collapse spaces
//! ```
//!
//! The [`pipeline::Pipeline`] is a pure function of `(text, dictionary)`.
//! [`batch`] applies it to every row of a dataset and [`cli`] exposes both
//! modes on the command line.

pub mod batch;
pub mod cli;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod pipeline;

pub use dictionary::{LoadReport, SlangDictionary};
pub use error::{Error, Result};
pub use pipeline::{PiiKind, PiiPattern, PiiRedactor, Pipeline, Sanitizer, SentinelStyle};
