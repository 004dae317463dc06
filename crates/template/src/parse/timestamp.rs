//! Timestamp normalizer - turns an ambiguous `#...#` date/time literal
//! into canonical `MM/DD/YYYY[ HH:MM:SS[ PM]]` text.
//!
//! The literal's field order is inferred from its divider: `day.month.year`
//! for `.`, `year-month-day` for `-`, and `month/day/year` (already
//! canonical) for `/`. A literal that cannot be normalized is never an
//! error; the caller flushes the original character sequence unchanged.

use super::TIMESTAMP_SIGIL;

/// A literal holds at most three date groups and three time groups.
const MAX_GROUPS: usize = 6;
/// Digit groups never exceed four characters (the year).
const MAX_GROUP_LEN: usize = 4;

/// Scan phase. `Start` covers the leading digit run, which belongs to
/// neither date nor time until a separator classifies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Start,
    Date,
    Time,
    /// Past the time groups; only an AM/PM suffix or the terminator may
    /// follow (or further digits, which reopen the time).
    TimeEnd,
    /// Saw `A` or `P`; the suffix must complete with `M`.
    AmPmM,
    AmPmDone,
    Final,
}

/// Outcome of feeding one code point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampStep {
    Continue,
    /// The literal is malformed. The normalizer keeps accumulating raw
    /// text so the caller can pass the span through verbatim.
    Rejected,
}

/// Per-occurrence literal parser. Created when the scanner enters a raw
/// timestamp literal and dropped when the literal ends.
#[derive(Debug)]
pub struct TimestampNormalizer {
    phase: Phase,
    groups: Vec<String>,
    in_digits: bool,
    divider: Option<char>,
    /// Number of groups that belong to the date, fixed at the date/time
    /// boundary. `None` while the date is still open.
    date_len: Option<usize>,
    pm: bool,
    raw: String,
    rejected: bool,
}

impl TimestampNormalizer {
    pub fn new() -> Self {
        Self {
            phase: Phase::Start,
            groups: Vec::new(),
            in_digits: false,
            divider: None,
            date_len: None,
            pm: false,
            raw: String::new(),
            rejected: false,
        }
    }

    /// Consume one code point of the literal body.
    pub fn feed(&mut self, ch: char) -> TimestampStep {
        self.raw.push(ch);
        if self.rejected || !self.accept(ch) {
            self.rejected = true;
            return TimestampStep::Rejected;
        }
        TimestampStep::Continue
    }

    /// Everything fed so far, unmodified. This is what passes through when
    /// the literal turns out to be malformed.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Terminator seen: produce the canonical, delimiter-wrapped text, or
    /// report failure leaving state untouched so the raw text can be used.
    pub fn finalize(&mut self) -> Option<String> {
        if self.rejected || self.phase == Phase::AmPmM {
            return None;
        }
        let date_len = self.date_len.unwrap_or(self.groups.len());
        let time_len = self.groups.len() - date_len;
        // A date is absent, a single bare number, or a full 3-part date.
        if !matches!(date_len, 0 | 1 | 3) || time_len > 3 {
            return None;
        }

        let date = &self.groups[..date_len];
        let date_text = match date_len {
            0 => String::new(),
            1 => date[0].clone(),
            _ => {
                let ordered: [&str; 3] = match self.divider {
                    // day.month.year
                    Some('.') => [&date[1], &date[0], &date[2]],
                    // year-month-day
                    Some('-') => [&date[1], &date[2], &date[0]],
                    _ => [&date[0], &date[1], &date[2]],
                }
                .map(String::as_str);
                ordered.join("/")
            }
        };
        let time_text = self.groups[date_len..].join(":");

        let mut canonical = String::new();
        canonical.push(TIMESTAMP_SIGIL);
        canonical.push_str(&date_text);
        if !time_text.is_empty() {
            if !date_text.is_empty() {
                canonical.push(' ');
            }
            canonical.push_str(&time_text);
        }
        if self.pm {
            canonical.push_str(" PM");
        }
        canonical.push(TIMESTAMP_SIGIL);

        self.phase = Phase::Final;
        Some(canonical)
    }

    fn accept(&mut self, ch: char) -> bool {
        if ch.is_ascii_digit() {
            self.accept_digit(ch)
        } else if matches!(ch, ' ' | '/' | '-' | '.' | ':') {
            self.accept_separator(ch)
        } else {
            self.accept_meridiem(ch)
        }
    }

    fn accept_digit(&mut self, ch: char) -> bool {
        if matches!(self.phase, Phase::AmPmM | Phase::AmPmDone | Phase::Final) {
            return false;
        }
        if self.in_digits {
            match self.groups.last_mut() {
                Some(group) if group.len() < MAX_GROUP_LEN => {
                    group.push(ch);
                    true
                }
                _ => false,
            }
        } else {
            if self.groups.len() == MAX_GROUPS {
                return false;
            }
            // Digits after a completed time boundary reopen the time.
            if self.phase == Phase::TimeEnd {
                self.phase = Phase::Time;
            }
            self.groups.push(ch.to_string());
            self.in_digits = true;
            true
        }
    }

    fn accept_separator(&mut self, ch: char) -> bool {
        // A trailing period after the AM/PM letters is swallowed.
        if matches!(self.phase, Phase::AmPmM | Phase::AmPmDone) {
            return ch == '.';
        }
        if !self.in_digits {
            return false;
        }
        self.in_digits = false;
        match ch {
            ' ' => match self.phase {
                Phase::Start | Phase::Date => {
                    self.date_len = Some(self.groups.len());
                    self.phase = Phase::Time;
                    true
                }
                Phase::Time => {
                    self.phase = Phase::TimeEnd;
                    true
                }
                _ => false,
            },
            ':' => match self.phase {
                // The leading run turns out to be a time: the date is absent.
                Phase::Start => {
                    self.date_len = Some(0);
                    self.phase = Phase::Time;
                    true
                }
                Phase::Time => true,
                _ => false,
            },
            divider => match self.phase {
                Phase::Start | Phase::Date => match self.divider {
                    // The first divider seen is locked for the whole literal.
                    Some(locked) if locked != divider => false,
                    _ => {
                        self.divider = Some(divider);
                        self.phase = Phase::Date;
                        true
                    }
                },
                _ => false,
            },
        }
    }

    fn accept_meridiem(&mut self, ch: char) -> bool {
        match self.phase {
            Phase::AmPmM => {
                if matches!(ch, 'M' | 'm') {
                    self.phase = Phase::AmPmDone;
                    true
                } else {
                    false
                }
            }
            Phase::AmPmDone | Phase::Final => false,
            _ => {
                if !matches!(ch, 'A' | 'a' | 'P' | 'p') {
                    return false;
                }
                // Only directly after a digit run or at the post-time boundary.
                if !self.in_digits && self.phase != Phase::TimeEnd {
                    return false;
                }
                self.pm = matches!(ch, 'P' | 'p');
                self.in_digits = false;
                self.phase = Phase::AmPmM;
                true
            }
        }
    }
}

impl Default for TimestampNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalize a single `#...#` timestamp literal.
///
/// Anything that is not one well-formed, `#`-delimited span - or whose body
/// cannot be read as a date/time - is returned unchanged.
pub fn normalize_timestamp(literal: &str) -> String {
    let mut chars = literal.chars();
    if chars.next() != Some(TIMESTAMP_SIGIL) {
        return literal.to_string();
    }
    let body: Vec<char> = chars.collect();
    match body.split_last() {
        Some((&last, inner))
            if last == TIMESTAMP_SIGIL && !inner.is_empty() && !inner.contains(&TIMESTAMP_SIGIL) =>
        {
            let mut normalizer = TimestampNormalizer::new();
            for &ch in inner {
                normalizer.feed(ch);
            }
            normalizer
                .finalize()
                .unwrap_or_else(|| literal.to_string())
        }
        _ => literal.to_string(),
    }
}
