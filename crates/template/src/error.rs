//! Error types for template compilation and resolution
//!
//! Every failure is surfaced as a returned value; nothing panics and
//! nothing crosses the statement-execution boundary as an exception. A
//! failed compile yields no plan, a failed resolve yields no statement
//! text.

use std::fmt;
use thiserror::Error;

/// Reasons a template fails to compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// An opening delimiter appeared inside an already-open placeholder.
    #[error("unexpected open delimiter")]
    UnexpectedOpenDelimiter,
    /// A closing delimiter appeared with no placeholder open and was not
    /// doubled.
    #[error("unexpected close delimiter")]
    UnexpectedCloseDelimiter,
    /// The template ended while a placeholder was still being read.
    #[error("unterminated placeholder")]
    UnterminatedPlaceholder,
}

/// Compilation failure, with the offending char offset where feasible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub offset: Option<usize>,
}

impl ParseError {
    pub(crate) fn at(kind: ParseErrorKind, offset: usize) -> Self {
        Self {
            kind,
            offset: Some(offset),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.offset {
            Some(offset) => write!(f, "{} at offset {}", self.kind, offset),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for ParseError {}

/// Per-placeholder resolution failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("unknown binding '{0}'")]
    UnknownBinding(String),
    #[error("type mismatch for binding '{binding}': expected {expected}, found {found}")]
    TypeMismatch {
        binding: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// Combined error for the compile-then-resolve convenience path.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TemplateError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}
