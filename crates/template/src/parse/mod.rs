//! Template parsing - the field extractor, the timestamp normalizer, and
//! the single-pass scanner that drives both.

pub mod field;
pub mod scanner;
pub mod timestamp;

// Re-export the entry points (the sub-parsers stay reachable for callers
// that want to drive them directly)
pub use scanner::compile;
pub use timestamp::normalize_timestamp;

/// Opens a placeholder expression.
pub(crate) const PLACEHOLDER_OPEN: char = '{';
/// Closes a placeholder expression.
pub(crate) const PLACEHOLDER_CLOSE: char = '}';
/// Marks the following placeholder as string-valued (quote-wrapped).
pub(crate) const STRING_SIGIL: char = '$';
/// Marks the following placeholder as timestamp-valued, or opens a raw
/// timestamp literal.
pub(crate) const TIMESTAMP_SIGIL: char = '#';
/// Quote wrapper emitted around string-valued placeholders.
pub(crate) const STRING_QUOTE: char = '\'';
