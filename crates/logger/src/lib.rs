//! Environment-aware structured logger
//!
//! Log calls are filtered against a minimum level, formatted as a multi-line
//! human-readable block in development or a single JSON line elsewhere, and
//! written to a per-level sink. Everything is suppressed in the test
//! environment. Logging never fails: formatting problems degrade to
//! placeholder text.

pub mod entry;
pub mod logger;
pub mod sink;

pub use entry::{context, Context, LogEntry, LogError};
pub use logger::Logger;
pub use sink::{ConsoleSink, LogSink, MemorySink};
