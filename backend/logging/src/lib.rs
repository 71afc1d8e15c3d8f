//! Structured logging for FileKit.
//!
//! Console and rolling NDJSON output, plus scrubbing of client-supplied
//! values before they reach a log line.

pub mod logger;
pub mod redact;

pub use logger::init_logger;
pub use redact::redact_file_name;
