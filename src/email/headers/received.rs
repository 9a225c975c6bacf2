use std::fmt::{Debug, Display};

use chrono::offset::FixedOffset;
use chrono::DateTime;

use crate::email::parse::date_time::date_clause;
use crate::email::parse::fallback::fallback_date;
use crate::email::parse::received::{split_value, strip_trailing_comment, SplitKind, SplitOutcome};
use crate::email::unfold;

pub const FIELD_NAME: &str = "Received";

const DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

/// Where a [`ReceivedDate`] came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DateSource {
    /// Parsed from the date clause; time and offset are as written.
    Strict,
    /// Recovered from unstructured text; always midnight `+0000`.
    Fallback,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ReceivedDate {
    pub value: DateTime<FixedOffset>,
    pub source: DateSource,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedReceived {
    pub info: String,
    pub date: Option<ReceivedDate>,
}

impl From<SplitOutcome> for ParsedReceived {
    fn from(outcome: SplitOutcome) -> Self {
        match outcome {
            SplitOutcome::Structured { info, date_clause: clause } => {
                let date = if clause.is_empty() {
                    None
                } else {
                    match date_clause(clause.as_bytes()) {
                        Ok(value) => Some(ReceivedDate {
                            value,
                            source: DateSource::Strict,
                        }),
                        Err(e) => {
                            log::debug!("no date in {:?}: {}", clause, e);
                            None
                        }
                    }
                };
                Self { info, date }
            }
            SplitOutcome::Unstructured { raw } => {
                let date = match fallback_date(&raw) {
                    Ok(value) => Some(ReceivedDate {
                        value,
                        source: DateSource::Fallback,
                    }),
                    Err(e) => {
                        log::debug!("no date in {:?}: {}", raw, e);
                        None
                    }
                };
                Self {
                    info: String::new(),
                    date,
                }
            }
        }
    }
}

/// A `Received:` trace field.
///
/// The value is parsed once, when the field is built, and never again; every
/// accessor reads the cached result. Malformed values never produce an error,
/// they just yield an empty `info` and/or no date.
#[derive(Clone)]
pub struct ReceivedField {
    value: String,
    kind: SplitKind,
    parsed: ParsedReceived,
}

impl ReceivedField {
    /// `value` is the field body, without the `Received:` name.
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let outcome = split_value(&value);
        let kind = SplitKind::from(&outcome);
        Self {
            value,
            kind,
            parsed: outcome.into(),
        }
    }

    /// Build from a whole `Received: ...` header line. `None` if the line is
    /// some other field.
    pub fn parse_line(line: &str) -> Option<Self> {
        let colon = line.find(':')?;
        let (name, value) = (&line[..colon], &line[colon + 1..]);
        if Self::matches_name(name.trim_end()) {
            Some(Self::new(value.trim()))
        } else {
            None
        }
    }

    pub fn matches_name(name: &str) -> bool {
        name.eq_ignore_ascii_case(FIELD_NAME)
    }

    pub fn name(&self) -> &'static str {
        FIELD_NAME
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn info(&self) -> &str {
        &self.parsed.info
    }

    pub fn date_time(&self) -> Option<DateTime<FixedOffset>> {
        self.parsed.date.map(|date| date.value)
    }

    pub fn received_date(&self) -> Option<ReceivedDate> {
        self.parsed.date
    }

    pub fn parsed(&self) -> &ParsedReceived {
        &self.parsed
    }

    /// Whether the value tokenized, i.e. whether `info` and the date are trustworthy.
    pub fn split_kind(&self) -> SplitKind {
        self.kind
    }

    /// `Www, DD Mon YYYY HH:MM:SS +ZZZZ`, with the offset the date was written in.
    pub fn formatted_date(&self) -> Option<String> {
        self.date_time()
            .map(|date_time| date_time.format(DATE_FORMAT).to_string())
    }

    /// The value without a trailing comment such as a zone name.
    pub fn decoded(&self) -> &str {
        strip_trailing_comment(&self.value)
    }

    /// The field as it goes on the wire: a single line ending in CRLF. Folding
    /// long lines is left to whoever writes the header block.
    pub fn encoded(&self) -> String {
        format!("{}: {}\r\n", FIELD_NAME, unfold(self.decoded()))
    }
}

impl Debug for ReceivedField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Raw: {}", self.value)?;
        writeln!(f, "Kind: {:?}", self.kind)?;
        writeln!(f, "Info: {}", self.parsed.info)?;
        write!(f, "Date: {:?}", self.parsed.date)
    }
}

impl Display for ReceivedField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", FIELD_NAME, self.decoded())
    }
}

impl From<&str> for ReceivedField {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ReceivedField {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
