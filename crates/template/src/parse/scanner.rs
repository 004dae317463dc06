//! Template scanner - a single pass over the whole template that buffers
//! literal runs, dispatches to the field extractor and the timestamp
//! normalizer at unescaped delimiters, and splices their results into an
//! ordered plan.

use std::mem;

use super::field::{FieldExtractor, FieldStep};
use super::timestamp::TimestampNormalizer;
use super::{PLACEHOLDER_CLOSE, PLACEHOLDER_OPEN, STRING_QUOTE, STRING_SIGIL, TIMESTAMP_SIGIL};
use crate::error::{ParseError, ParseErrorKind};
use crate::plan::{CompiledPlan, PlaceholderKind, Segment};

/// Compile a template into a reusable plan of literal segments and
/// placeholder resolutions.
///
/// The plan can be resolved any number of times against different binding
/// contexts; parsing happens exactly once.
pub fn compile(template: &str) -> Result<CompiledPlan, ParseError> {
    let mut scanner = Scanner::new();
    let mut length = 0;
    for (offset, ch) in template.chars().enumerate() {
        scanner.step(offset, ch)?;
        length = offset + 1;
    }
    let plan = scanner.finish(length)?;
    tracing::debug!(
        "compiled template: {} chars -> {} segments",
        length,
        plan.len()
    );
    Ok(plan)
}

/// Which sigil was seen last while scanning plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sigil {
    Str,
    Timestamp,
}

/// Scanner state. Sub-parsers live inside the state they serve, so each
/// placeholder or literal occurrence gets a fresh instance.
#[derive(Debug)]
enum ScanState {
    Plain,
    SawSigil(Sigil),
    InTimestamp(TimestampNormalizer),
    InPlaceholder {
        kind: PlaceholderKind,
        extractor: FieldExtractor,
        opened_at: usize,
    },
    /// A close brace outside any placeholder must be doubled.
    WaitCloseBrace,
}

#[derive(Debug)]
struct Scanner {
    state: ScanState,
    literal: String,
    segments: Vec<Segment>,
}

impl Scanner {
    fn new() -> Self {
        Self {
            state: ScanState::Plain,
            literal: String::new(),
            segments: Vec::new(),
        }
    }

    fn step(&mut self, at: usize, ch: char) -> Result<(), ParseError> {
        let state = mem::replace(&mut self.state, ScanState::Plain);
        match state {
            ScanState::Plain => self.step_plain(at, ch),
            ScanState::SawSigil(sigil) => self.step_sigil(sigil, at, ch),
            ScanState::InTimestamp(normalizer) => self.step_timestamp(normalizer, ch),
            ScanState::InPlaceholder {
                kind,
                extractor,
                opened_at,
            } => self.step_placeholder(kind, extractor, opened_at, at, ch),
            ScanState::WaitCloseBrace => {
                if ch == PLACEHOLDER_CLOSE {
                    self.literal.push(PLACEHOLDER_CLOSE);
                    Ok(())
                } else {
                    Err(ParseError::at(
                        ParseErrorKind::UnexpectedCloseDelimiter,
                        at - 1,
                    ))
                }
            }
        }
    }

    fn step_plain(&mut self, at: usize, ch: char) -> Result<(), ParseError> {
        match ch {
            STRING_SIGIL => self.state = ScanState::SawSigil(Sigil::Str),
            TIMESTAMP_SIGIL => self.state = ScanState::SawSigil(Sigil::Timestamp),
            PLACEHOLDER_OPEN => {
                self.state = ScanState::InPlaceholder {
                    kind: PlaceholderKind::PlainValue,
                    extractor: FieldExtractor::new(),
                    opened_at: at,
                }
            }
            PLACEHOLDER_CLOSE => self.state = ScanState::WaitCloseBrace,
            _ => self.literal.push(ch),
        }
        Ok(())
    }

    fn step_sigil(&mut self, sigil: Sigil, at: usize, ch: char) -> Result<(), ParseError> {
        match (sigil, ch) {
            // A doubled sigil is one literal occurrence of the character.
            (Sigil::Str, STRING_SIGIL) => {
                self.literal.push(STRING_SIGIL);
                Ok(())
            }
            (Sigil::Timestamp, TIMESTAMP_SIGIL) => {
                self.literal.push(TIMESTAMP_SIGIL);
                Ok(())
            }
            (Sigil::Str, PLACEHOLDER_OPEN) => {
                self.open_placeholder(PlaceholderKind::StringValue, STRING_QUOTE, at);
                Ok(())
            }
            (Sigil::Timestamp, PLACEHOLDER_OPEN) => {
                self.open_placeholder(PlaceholderKind::TimestampValue, TIMESTAMP_SIGIL, at);
                Ok(())
            }
            // `$` introduced nothing after all; it is plain text.
            (Sigil::Str, _) => {
                self.literal.push(STRING_SIGIL);
                self.step(at, ch)
            }
            // Anything else after `#` starts a raw timestamp literal.
            (Sigil::Timestamp, _) => {
                let mut normalizer = TimestampNormalizer::new();
                normalizer.feed(ch);
                self.state = ScanState::InTimestamp(normalizer);
                Ok(())
            }
        }
    }

    /// Flush the opening quote wrapper along with any pending literal text;
    /// the matching closing wrapper is emitted when the placeholder
    /// completes.
    fn open_placeholder(&mut self, kind: PlaceholderKind, quote: char, at: usize) {
        self.literal.push(quote);
        self.flush_literal();
        self.state = ScanState::InPlaceholder {
            kind,
            extractor: FieldExtractor::new(),
            opened_at: at,
        };
    }

    fn step_timestamp(
        &mut self,
        mut normalizer: TimestampNormalizer,
        ch: char,
    ) -> Result<(), ParseError> {
        if ch == TIMESTAMP_SIGIL {
            match normalizer.finalize() {
                Some(canonical) => {
                    self.flush_literal();
                    self.segments.push(Segment::Placeholder {
                        kind: PlaceholderKind::TimestampLiteral,
                        expr: canonical,
                    });
                }
                // Malformed literal: pass the original through, delimiters
                // included.
                None => {
                    self.literal.push(TIMESTAMP_SIGIL);
                    self.literal.push_str(normalizer.raw());
                    self.literal.push(TIMESTAMP_SIGIL);
                }
            }
        } else {
            normalizer.feed(ch);
            self.state = ScanState::InTimestamp(normalizer);
        }
        Ok(())
    }

    fn step_placeholder(
        &mut self,
        kind: PlaceholderKind,
        mut extractor: FieldExtractor,
        opened_at: usize,
        at: usize,
        ch: char,
    ) -> Result<(), ParseError> {
        match extractor.feed(ch) {
            Ok(FieldStep::Continue) => {
                self.state = ScanState::InPlaceholder {
                    kind,
                    extractor,
                    opened_at,
                };
                Ok(())
            }
            Ok(FieldStep::Complete) => {
                self.flush_literal();
                self.segments.push(Segment::Placeholder {
                    kind,
                    expr: extractor.text().to_string(),
                });
                // The closing wrapper joins the next literal run.
                match kind {
                    PlaceholderKind::StringValue => self.literal.push(STRING_QUOTE),
                    PlaceholderKind::TimestampValue => self.literal.push(TIMESTAMP_SIGIL),
                    _ => {}
                }
                Ok(())
            }
            Ok(FieldStep::Escaped) => {
                self.literal.push(PLACEHOLDER_OPEN);
                Ok(())
            }
            Err(kind) => Err(ParseError::at(kind, at)),
        }
    }

    fn finish(mut self, length: usize) -> Result<CompiledPlan, ParseError> {
        match mem::replace(&mut self.state, ScanState::Plain) {
            ScanState::Plain => {}
            ScanState::SawSigil(Sigil::Str) => self.literal.push(STRING_SIGIL),
            ScanState::SawSigil(Sigil::Timestamp) => self.literal.push(TIMESTAMP_SIGIL),
            // A literal that never terminated is flushed as-is, not an error.
            ScanState::InTimestamp(normalizer) => {
                self.literal.push(TIMESTAMP_SIGIL);
                self.literal.push_str(normalizer.raw());
            }
            ScanState::InPlaceholder { opened_at, .. } => {
                return Err(ParseError::at(
                    ParseErrorKind::UnterminatedPlaceholder,
                    opened_at,
                ));
            }
            ScanState::WaitCloseBrace => {
                return Err(ParseError::at(
                    ParseErrorKind::UnexpectedCloseDelimiter,
                    length - 1,
                ));
            }
        }
        self.flush_literal();
        Ok(CompiledPlan::new(self.segments))
    }

    fn flush_literal(&mut self) {
        if !self.literal.is_empty() {
            self.segments
                .push(Segment::Literal(mem::take(&mut self.literal)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal(text: &str) -> Segment {
        Segment::Literal(text.to_string())
    }

    fn placeholder(kind: PlaceholderKind, expr: &str) -> Segment {
        Segment::Placeholder {
            kind,
            expr: expr.to_string(),
        }
    }

    #[test]
    fn test_plain_text_is_one_literal() {
        let plan = compile("SELECT * FROM users").unwrap();
        assert_eq!(plan.segments(), &[literal("SELECT * FROM users")]);
    }

    #[test]
    fn test_empty_template() {
        let plan = compile("").unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn test_plain_placeholder() {
        let plan = compile("WHERE id = {id}").unwrap();
        assert_eq!(
            plan.segments(),
            &[
                literal("WHERE id = "),
                placeholder(PlaceholderKind::PlainValue, "id"),
            ]
        );
    }

    #[test]
    fn test_string_placeholder_is_quote_wrapped() {
        let plan = compile("${name}").unwrap();
        assert_eq!(
            plan.segments(),
            &[
                literal("'"),
                placeholder(PlaceholderKind::StringValue, "name"),
                literal("'"),
            ]
        );
    }

    #[test]
    fn test_timestamp_placeholder_is_sigil_wrapped() {
        let plan = compile("#{when}").unwrap();
        assert_eq!(
            plan.segments(),
            &[
                literal("#"),
                placeholder(PlaceholderKind::TimestampValue, "when"),
                literal("#"),
            ]
        );
    }

    #[test]
    fn test_timestamp_literal_is_normalized() {
        let plan = compile("WHERE at = #9.2.2019#").unwrap();
        assert_eq!(
            plan.segments(),
            &[
                literal("WHERE at = "),
                placeholder(PlaceholderKind::TimestampLiteral, "#2/9/2019#"),
            ]
        );
    }

    #[test]
    fn test_malformed_timestamp_literal_passes_through() {
        let plan = compile("WHERE at = #1/2/3/4# AND 1=1").unwrap();
        assert_eq!(
            plan.segments(),
            &[literal("WHERE at = #1/2/3/4# AND 1=1")]
        );
    }

    #[test]
    fn test_doubled_delimiters_escape() {
        assert_eq!(compile("{{").unwrap().segments(), &[literal("{")]);
        assert_eq!(compile("}}").unwrap().segments(), &[literal("}")]);
        assert_eq!(compile("$$").unwrap().segments(), &[literal("$")]);
        assert_eq!(compile("##").unwrap().segments(), &[literal("#")]);
    }

    #[test]
    fn test_escapes_merge_into_surrounding_literal() {
        let plan = compile("a{{b}}c$$d##e").unwrap();
        assert_eq!(plan.segments(), &[literal("a{b}c$d#e")]);
    }

    #[test]
    fn test_sigil_before_ordinary_text_is_literal() {
        let plan = compile("cost: $5").unwrap();
        assert_eq!(plan.segments(), &[literal("cost: $5")]);
    }

    #[test]
    fn test_trailing_sigil_is_literal() {
        assert_eq!(compile("x$").unwrap().segments(), &[literal("x$")]);
        assert_eq!(compile("x#").unwrap().segments(), &[literal("x#")]);
    }

    #[test]
    fn test_unterminated_timestamp_literal_flushes_raw() {
        let plan = compile("#1999-7-12").unwrap();
        assert_eq!(plan.segments(), &[literal("#1999-7-12")]);
    }

    #[test]
    fn test_unterminated_placeholder_fails() {
        let error = compile("{test").unwrap_err();
        assert_eq!(error.kind, ParseErrorKind::UnterminatedPlaceholder);
        assert_eq!(error.offset, Some(0));
    }

    #[test]
    fn test_nested_open_delimiter_fails() {
        let error = compile("{test{test2").unwrap_err();
        assert_eq!(error.kind, ParseErrorKind::UnexpectedOpenDelimiter);
        assert_eq!(error.offset, Some(5));
    }

    #[test]
    fn test_lone_close_delimiter_fails() {
        let error = compile("a} b").unwrap_err();
        assert_eq!(error.kind, ParseErrorKind::UnexpectedCloseDelimiter);
        assert_eq!(error.offset, Some(1));

        let error = compile("a}").unwrap_err();
        assert_eq!(error.kind, ParseErrorKind::UnexpectedCloseDelimiter);
        assert_eq!(error.offset, Some(1));
    }

    #[test]
    fn test_mixed_template() {
        let plan =
            compile("INSERT INTO t (a, b, c) VALUES ({a}, ${b}, #{c}) -- #9.2.2019#").unwrap();
        assert_eq!(
            plan.segments(),
            &[
                literal("INSERT INTO t (a, b, c) VALUES ("),
                placeholder(PlaceholderKind::PlainValue, "a"),
                literal(", '"),
                placeholder(PlaceholderKind::StringValue, "b"),
                literal("', #"),
                placeholder(PlaceholderKind::TimestampValue, "c"),
                literal("#) -- "),
                placeholder(PlaceholderKind::TimestampLiteral, "#2/9/2019#"),
            ]
        );
    }
}
