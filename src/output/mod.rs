//! Output module
//!
//! Sinks that receive projected values while an invocation runs.
//!
//! # Overview
//!
//! - [`ResultSink`] - the consumer trait, also implemented by closures
//! - [`CollectSink`] - buffers values in memory
//! - [`JsonLinesSink`] - writes JSON documents to any [`std::io::Write`]

mod sink;

pub use sink::{CollectSink, JsonLinesSink, OutputFormat, ResultSink};
