//! Result sinks
//!
//! Consumers of projected values. The invoker emits in page order and never
//! from more than one task at a time.

use crate::error::{Error, Result};
use crate::types::JsonValue;
use serde::Serialize;
use std::io::Write;

/// Receives projected values as pages arrive
pub trait ResultSink<T> {
    /// Accept one value
    ///
    /// An error aborts the invocation.
    fn emit(&mut self, value: T) -> Result<()>;
}

impl<T, F> ResultSink<T> for F
where
    F: FnMut(T) -> Result<()>,
{
    fn emit(&mut self, value: T) -> Result<()> {
        self(value)
    }
}

// ============================================================================
// Collect Sink
// ============================================================================

/// Keeps every emitted value in memory
#[derive(Debug, Clone, PartialEq)]
pub struct CollectSink<T> {
    values: Vec<T>,
}

impl<T> Default for CollectSink<T> {
    fn default() -> Self {
        Self { values: Vec::new() }
    }
}

impl<T> CollectSink<T> {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Values received so far, in emission order
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Number of values received
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing was received
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Consume the sink, returning its values
    pub fn into_values(self) -> Vec<T> {
        self.values
    }
}

impl<T> ResultSink<T> for CollectSink<T> {
    fn emit(&mut self, value: T) -> Result<()> {
        self.values.push(value);
        Ok(())
    }
}

// ============================================================================
// JSON Lines Sink
// ============================================================================

/// Output format for [`JsonLinesSink`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// One compact JSON document per line
    #[default]
    Json,
    /// Indented JSON documents
    Pretty,
}

/// Writes each value as JSON to a writer
///
/// Null values are skipped. With unrolling enabled, arrays are written one
/// element at a time.
pub struct JsonLinesSink<W: Write> {
    writer: W,
    format: OutputFormat,
    unroll: bool,
    written: usize,
}

impl<W: Write> JsonLinesSink<W> {
    /// Write compact JSON lines to `writer`
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            format: OutputFormat::default(),
            unroll: false,
            written: 0,
        }
    }

    /// Set the output format
    #[must_use]
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Write array elements individually
    #[must_use]
    pub fn with_unroll(mut self, unroll: bool) -> Self {
        self.unroll = unroll;
        self
    }

    /// Number of documents written
    pub fn written(&self) -> usize {
        self.written
    }

    /// Consume the sink, returning the writer
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_value(&mut self, value: &JsonValue) -> Result<()> {
        if value.is_null() {
            return Ok(());
        }
        match self.format {
            OutputFormat::Json => serde_json::to_writer(&mut self.writer, value),
            OutputFormat::Pretty => serde_json::to_writer_pretty(&mut self.writer, value),
        }
        .map_err(|e| Error::sink(e.to_string()))?;
        writeln!(self.writer).map_err(|e| Error::sink(e.to_string()))?;
        self.writer
            .flush()
            .map_err(|e| Error::sink(e.to_string()))?;
        self.written += 1;
        Ok(())
    }
}

impl<W: Write, T: Serialize> ResultSink<T> for JsonLinesSink<W> {
    fn emit(&mut self, value: T) -> Result<()> {
        let value = serde_json::to_value(value)?;
        match value {
            JsonValue::Array(items) if self.unroll => {
                for item in &items {
                    self.write_value(item)?;
                }
                Ok(())
            }
            other => self.write_value(&other),
        }
    }
}

impl<W: Write> std::fmt::Debug for JsonLinesSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonLinesSink")
            .field("format", &self.format)
            .field("unroll", &self.unroll)
            .field("written", &self.written)
            .finish_non_exhaustive()
    }
}
