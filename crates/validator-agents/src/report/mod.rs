//! Report rendering

pub mod formatter;

pub use formatter::{
    Formatter, FormatterFactory, JsonFormatter, MarkdownFormatter, ReportFormat, TextFormatter,
};
