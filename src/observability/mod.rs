//! Tracing with file-based OTLP span export.
//!
//! ```text
//! tracing → tracing-opentelemetry → opentelemetry_sdk → FileSpanExporter → RotatingFile
//! ```
//!
//! Spans land in `~/.local/share/zellij/chordsource/chordsource-otlp.json`, one
//! OTLP JSON document per line, rotated at 10 MB with 3 backups. The filter
//! level comes from the `trace_level` plugin option (default `info`).
//!
//! # Modules
//!
//! - `init`: Subscriber setup
//! - `tracer`: Tracer provider and file span exporter
//! - `span_formatter`: OTLP JSON encoding
//! - `file_writer`: Size-rotated export file

mod file_writer;
mod init;
mod span_formatter;
mod tracer;

pub use init::init_tracing;
