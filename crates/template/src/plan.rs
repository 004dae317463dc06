//! Compiled plan - the ordered segment sequence a template compiles to,
//! and the resolution phase that evaluates it against a binding context.

use serde::{Deserialize, Serialize};
use sqlweave_core::{Context, Value};

use crate::error::ResolveError;

/// How a placeholder's resolved text is treated in the statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaceholderKind {
    /// Spliced with no quoting of any kind. Safe only for values the
    /// caller controls.
    PlainValue,
    /// Wrapped in single quotes by the surrounding literal segments. The
    /// resolved text itself is spliced verbatim; embedded quotes are the
    /// caller's responsibility.
    StringValue,
    /// Wrapped in `#` delimiters; the bound value must be a timestamp.
    TimestampValue,
    /// An already-normalized timestamp literal. `expr` holds the final
    /// text and resolves to itself without a lookup.
    TimestampLiteral,
}

/// One element of a compiled template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Segment {
    /// Literal statement text, emitted as-is.
    Literal(String),
    /// A span replaced at resolution time.
    Placeholder { kind: PlaceholderKind, expr: String },
}

/// A parsed template, reusable across any number of binding contexts.
///
/// Segment order is significant: resolving concatenates the segments in
/// order to produce the statement text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledPlan {
    segments: Vec<Segment>,
}

impl CompiledPlan {
    pub(crate) fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Resolve every placeholder against `bindings` and concatenate.
    ///
    /// Fails on the first unknown binding or type mismatch; no partial
    /// statement text is ever returned.
    pub fn resolve<C: Context + ?Sized>(&self, bindings: &C) -> Result<String, ResolveError> {
        let mut statement = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => statement.push_str(text),
                Segment::Placeholder {
                    kind: PlaceholderKind::TimestampLiteral,
                    expr,
                } => statement.push_str(expr),
                Segment::Placeholder { kind, expr } => {
                    let value = bindings
                        .lookup(expr)
                        .ok_or_else(|| ResolveError::UnknownBinding(expr.clone()))?;
                    if *kind == PlaceholderKind::TimestampValue && value.as_datetime().is_none() {
                        return Err(ResolveError::TypeMismatch {
                            binding: expr.clone(),
                            expected: "timestamp",
                            found: value.type_name(),
                        });
                    }
                    tracing::trace!("resolved binding '{}' as {}: {}", expr, value.type_name(), value);
                    statement.push_str(&value.sql_text());
                }
            }
        }
        tracing::debug!(
            "resolved plan: {} segments -> {} chars",
            self.segments.len(),
            statement.len()
        );
        Ok(statement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::compile;
    use chrono::NaiveDate;
    use sqlweave_core::Bindings;

    #[test]
    fn test_plan_is_reusable_across_bindings() {
        let plan = compile("SELECT * FROM users WHERE id = {id}").unwrap();

        let first = plan.resolve(&Bindings::new().with("id", 1i64)).unwrap();
        let second = plan.resolve(&Bindings::new().with("id", 2i64)).unwrap();

        assert_eq!(first, "SELECT * FROM users WHERE id = 1");
        assert_eq!(second, "SELECT * FROM users WHERE id = 2");
    }

    #[test]
    fn test_unknown_binding_yields_no_output() {
        let plan = compile("{a}{b}").unwrap();
        let bindings = Bindings::new().with("a", 1i64);

        assert_eq!(
            plan.resolve(&bindings),
            Err(ResolveError::UnknownBinding("b".to_string()))
        );
    }

    #[test]
    fn test_timestamp_placeholder_requires_datetime() {
        let plan = compile("#{when}").unwrap();
        let bindings = Bindings::new().with("when", "not a date");

        assert_eq!(
            plan.resolve(&bindings),
            Err(ResolveError::TypeMismatch {
                binding: "when".to_string(),
                expected: "timestamp",
                found: "text",
            })
        );
    }

    #[test]
    fn test_timestamp_placeholder_formats_datetime() {
        let plan = compile("#{when}").unwrap();
        let noon = NaiveDate::from_ymd_opt(2019, 2, 9)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let bindings = Bindings::new().with("when", noon);

        assert_eq!(plan.resolve(&bindings).unwrap(), "#02/09/2019 12:00:00#");
    }

    #[test]
    fn test_midnight_timestamp_omits_time_part() {
        let plan = compile("#{when}").unwrap();
        let midnight = NaiveDate::from_ymd_opt(2019, 2, 9)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let bindings = Bindings::new().with("when", midnight);

        assert_eq!(plan.resolve(&bindings).unwrap(), "#02/09/2019#");
    }

    #[test]
    fn test_timestamp_literal_segment_needs_no_binding() {
        let plan = compile("#9.2.2019#").unwrap();
        assert_eq!(plan.resolve(&Bindings::new()).unwrap(), "#2/9/2019#");
    }
}
