use thiserror::Error;

type NomErr<'a> = nom::error::Error<&'a [u8]>;

/// Why a `Received` value, or one of its parts, could not be fully parsed.
///
/// None of these ever reach callers of [`ReceivedField`](crate::ReceivedField);
/// they decide which degraded result is produced and are logged.
#[derive(Debug, Error)]
pub enum EmailError<'a> {
    #[error("malformed input {}", near(.0))]
    Parse(NomErr<'a>),
    #[error("value does not tokenize, stopped {}", near(.0))]
    Unclassifiable(NomErr<'a>),
    #[error("no such date: {d} {m:?} {y}")]
    BadDate { y: u16, m: chrono::Month, d: u8 },
    #[error("bad zone offset {hh:02}{mm:02} (east: {is_east})")]
    BadTZOffset { is_east: bool, hh: u8, mm: u8 },
    #[error("bad time of day {h:02}:{m:02}:{s:?} on {date} ({tz})")]
    BadDateTime {
        date: chrono::NaiveDate,
        tz: chrono::offset::FixedOffset,
        h: u8,
        m: u8,
        s: Option<u8>,
    },
    #[error("no date pattern found")]
    DatePatternNotFound,
}

impl<'a> EmailError<'a> {
    /// True when the text was well formed but named a date or time that does not exist.
    pub fn is_out_of_range(&self) -> bool {
        matches!(
            self,
            Self::BadDate { .. } | Self::BadTZOffset { .. } | Self::BadDateTime { .. }
        )
    }
}

fn near(err: &NomErr<'_>) -> String {
    format!("({:?}) near {:?}", err.code, String::from_utf8_lossy(err.input))
}

impl<'a> From<NomErr<'a>> for EmailError<'a> {
    fn from(e: NomErr<'a>) -> Self {
        Self::Parse(e)
    }
}
