use std::fmt::Write as _;

use chrono::format::{self, Item, Parsed, StrftimeItems};
use chrono::NaiveDateTime;

use coltype_api::AdapterError;

// ═══════════════════════════════════════════════════════════════
//  Pattern letters → strftime
// ═══════════════════════════════════════════════════════════════

/// Separates the stored text from appended defaults while parsing.
const DEFAULTS_SEPARATOR: char = '\u{1f}';

/// Compiled date pattern: strftime equivalent plus the defaults needed to
/// parse text that carries only part of a date-time.
#[derive(Debug, Clone)]
pub(crate) struct DatePattern {
    source: String,
    strftime: String,
    parse_format: String,
    parse_suffix: String,
}

#[derive(Default)]
struct Components {
    year: bool,
    month: bool,
    day: bool,
    day_of_year: bool,
    hour24: bool,
    hour12: bool,
    am_pm: bool,
    minute: bool,
    second: bool,
}

impl DatePattern {
    /// Compile a pattern such as `yyyyMMddHHmmss` or `yyyy-MM-dd'T'HH:mm`.
    pub fn compile(pattern: &str) -> Result<Self, AdapterError> {
        if pattern.is_empty() {
            return Err(invalid(pattern, "pattern is empty"));
        }

        let mut strftime = String::new();
        let mut seen = Components::default();
        let mut chars = pattern.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '\'' {
                // '' is a literal quote; otherwise quoted text up to the next quote.
                if chars.peek() == Some(&'\'') {
                    chars.next();
                    strftime.push('\'');
                    continue;
                }
                let mut closed = false;
                while let Some(q) = chars.next() {
                    if q == '\'' {
                        if chars.peek() == Some(&'\'') {
                            chars.next();
                            strftime.push('\'');
                            continue;
                        }
                        closed = true;
                        break;
                    }
                    push_literal(&mut strftime, q);
                }
                if !closed {
                    return Err(invalid(pattern, "unterminated quote"));
                }
                continue;
            }

            if !c.is_ascii_alphabetic() {
                push_literal(&mut strftime, c);
                continue;
            }

            let mut count = 1;
            while chars.peek() == Some(&c) {
                chars.next();
                count += 1;
            }

            let directive = match (c, count) {
                ('y', 2) => {
                    seen.year = true;
                    "%y"
                }
                ('y', _) => {
                    seen.year = true;
                    "%Y"
                }
                ('M', 1) => {
                    seen.month = true;
                    "%-m"
                }
                ('M', 2) => {
                    seen.month = true;
                    "%m"
                }
                ('M', 3) => {
                    seen.month = true;
                    "%b"
                }
                ('M', _) => {
                    seen.month = true;
                    "%B"
                }
                ('d', 1) => {
                    seen.day = true;
                    "%-d"
                }
                ('d', _) => {
                    seen.day = true;
                    "%d"
                }
                ('D', _) => {
                    seen.day_of_year = true;
                    "%j"
                }
                ('H', 1) => {
                    seen.hour24 = true;
                    "%-H"
                }
                ('H', _) => {
                    seen.hour24 = true;
                    "%H"
                }
                ('h', 1) => {
                    seen.hour12 = true;
                    "%-I"
                }
                ('h', _) => {
                    seen.hour12 = true;
                    "%I"
                }
                ('a', _) => {
                    seen.am_pm = true;
                    "%p"
                }
                ('m', 1) => {
                    seen.minute = true;
                    "%-M"
                }
                ('m', _) => {
                    seen.minute = true;
                    "%M"
                }
                ('s', 1) => {
                    seen.second = true;
                    "%-S"
                }
                ('s', _) => {
                    seen.second = true;
                    "%S"
                }
                ('S', 3) => "%3f",
                ('S', 6) => "%6f",
                ('S', 9) => "%9f",
                ('E', 1..=3) => "%a",
                ('E', _) => "%A",
                ('z' | 'Z' | 'X', _) => {
                    return Err(invalid(pattern, "time zone letters are not supported"));
                }
                ('S', _) => {
                    return Err(invalid(pattern, "fraction must be SSS, SSSSSS or SSSSSSSSS"));
                }
                (other, _) => {
                    return Err(invalid(
                        pattern,
                        &format!("illegal pattern character '{other}'"),
                    ));
                }
            };
            strftime.push_str(directive);
        }

        if StrftimeItems::new(&strftime).any(|item| matches!(item, Item::Error)) {
            return Err(invalid(pattern, "not representable"));
        }

        let (parse_format, parse_suffix) = defaults_for(&strftime, &seen);
        Ok(Self {
            source: pattern.to_string(),
            strftime,
            parse_format,
            parse_suffix,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn strftime(&self) -> &str {
        &self.strftime
    }

    /// Parse `text`; the whole input must match the pattern.
    ///
    /// Whitespace in the pattern matches the same whitespace in `text`,
    /// never an arbitrary run of it.
    pub fn parse(&self, text: &str) -> Result<NaiveDateTime, chrono::ParseError> {
        let mut input = String::with_capacity(text.len() + self.parse_suffix.len());
        input.push_str(text);
        input.push_str(&self.parse_suffix);

        let items = StrftimeItems::new(&self.parse_format).map(|item| match item {
            Item::Space(s) => Item::Literal(s),
            other => other,
        });
        let mut parsed = Parsed::new();
        format::parse(&mut parsed, &input, items)?;
        parsed.to_naive_datetime_with_offset(0)
    }

    pub fn format(&self, value: &NaiveDateTime) -> Result<String, std::fmt::Error> {
        let mut out = String::new();
        write!(out, "{}", value.format(&self.strftime))?;
        Ok(out)
    }
}

/// Fields absent from the pattern default to 1970-01-01 00:00:00 (AM).
fn defaults_for(strftime: &str, seen: &Components) -> (String, String) {
    let mut format = strftime.to_string();
    let mut suffix = String::new();
    let mut add = |directive: &str, value: &str| {
        format.push(DEFAULTS_SEPARATOR);
        format.push_str(directive);
        suffix.push(DEFAULTS_SEPARATOR);
        suffix.push_str(value);
    };

    if !seen.year {
        add("%Y", "1970");
    }
    if !seen.day_of_year {
        if !seen.month {
            add("%m", "01");
        }
        if !seen.day {
            add("%d", "01");
        }
    }
    if !seen.hour24 {
        if !seen.hour12 {
            add("%H", "00");
        } else if !seen.am_pm {
            add("%p", "AM");
        }
    }
    if !seen.minute {
        add("%M", "00");
    }
    if !seen.second {
        add("%S", "00");
    }

    (format, suffix)
}

fn push_literal(out: &mut String, c: char) {
    if c == '%' {
        out.push_str("%%");
    } else {
        out.push(c);
    }
}

fn invalid(pattern: &str, reason: &str) -> AdapterError {
    AdapterError::config(format!("invalid date pattern [{pattern}]: {reason}"))
}
