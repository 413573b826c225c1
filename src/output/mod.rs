//! Report rendering for console and JSON output

pub mod formatter;

pub use formatter::Formatter;
