use chrono::offset::FixedOffset;
use chrono::DateTime;
use chrono::TimeZone;
use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::bytes::complete::tag_no_case;
use nom::combinator::all_consuming;
use nom::combinator::map;
use nom::combinator::opt;
use nom::combinator::value;
use nom::error::Error;
use nom::error::ErrorKind;
use nom::error::ParseError;
use nom::multi::fold_many_m_n;
use nom::sequence::tuple;
use nom::IResult;

use super::super::error::EmailError;
use super::comment;
use super::fws;
use super::satisfy_byte;

fn day_of_week(input: &[u8]) -> IResult<&[u8], chrono::Weekday> {
    use chrono::Weekday;
    map(
        tuple((
            opt(fws),
            alt((
                value(Weekday::Mon, tag_no_case(b"Mon")),
                value(Weekday::Tue, tag_no_case(b"Tue")),
                value(Weekday::Wed, tag_no_case(b"Wed")),
                value(Weekday::Thu, tag_no_case(b"Thu")),
                value(Weekday::Fri, tag_no_case(b"Fri")),
                value(Weekday::Sat, tag_no_case(b"Sat")),
                value(Weekday::Sun, tag_no_case(b"Sun")),
            )),
            tag(b","),
        )),
        |(_, dow, _)| dow,
    )(input)
}

fn month(input: &[u8]) -> IResult<&[u8], chrono::Month> {
    use chrono::Month;
    alt((
        value(Month::January, tag_no_case(b"Jan")),
        value(Month::February, tag_no_case(b"Feb")),
        value(Month::March, tag_no_case(b"Mar")),
        value(Month::April, tag_no_case(b"Apr")),
        value(Month::May, tag_no_case(b"May")),
        value(Month::June, tag_no_case(b"Jun")),
        value(Month::July, tag_no_case(b"Jul")),
        value(Month::August, tag_no_case(b"Aug")),
        value(Month::September, tag_no_case(b"Sep")),
        value(Month::October, tag_no_case(b"Oct")),
        value(Month::November, tag_no_case(b"Nov")),
        value(Month::December, tag_no_case(b"Dec")),
    ))(input)
}

fn day(input: &[u8]) -> IResult<&[u8], u8> {
    map(
        tuple((
            opt(fws),
            fold_many_m_n(1, 2, satisfy_byte(|ch| ch.is_ascii_digit()), 0, |acc, n| {
                acc * 10 + (n - b'0')
            }),
            fws,
        )),
        |(_, day, _)| day,
    )(input)
}

fn year(input: &[u8]) -> IResult<&[u8], u16> {
    map(
        tuple((
            fws,
            fold_many_m_n(4, 4, satisfy_byte(|ch| ch.is_ascii_digit()), 0, |acc, n| {
                acc * 10 + u16::from(n - b'0')
            }),
            fws,
        )),
        |(_, year, _)| year,
    )(input)
}

fn date(input: &[u8]) -> IResult<&[u8], chrono::NaiveDate, EmailError> {
    let (i, (day, month, year)) = tuple((day, month, year))(input).map_err(nom::Err::convert)?;
    let date = chrono::NaiveDate::from_ymd_opt(
        i32::from(year),
        month.number_from_month(),
        u32::from(day),
    )
    .ok_or_else(|| {
        nom::Err::Error(EmailError::BadDate {
            y: year,
            m: month,
            d: day,
        })
    })?;
    Ok((i, date))
}

fn two_digit(input: &[u8]) -> IResult<&[u8], u8> {
    fold_many_m_n(2, 2, satisfy_byte(|ch| ch.is_ascii_digit()), 0, |acc, n| {
        acc * 10 + (n - b'0')
    })(input)
}

fn time(
    date: chrono::NaiveDate,
) -> impl Fn(&[u8]) -> IResult<&[u8], DateTime<FixedOffset>, EmailError> {
    move |i| {
        let (i, (h, _, m, s)) = tuple((
            two_digit,
            tag(b":"),
            two_digit,
            opt(map(tuple((tag(b":"), two_digit)), |(_, s)| s)),
        ))(i)
        .map_err(nom::Err::convert)?;
        let (i, (_, pm, hh, mm)) =
            tuple((fws, alt((tag(b"+"), tag(b"-"))), two_digit, two_digit))(i)
                .map_err(nom::Err::convert)?;
        let is_east = pm == b"+";
        let offset_seconds = i32::from(hh) * 3600 + i32::from(mm) * 60;
        let tz = if mm > 59 {
            None
        } else if is_east {
            FixedOffset::east_opt(offset_seconds)
        } else {
            FixedOffset::west_opt(offset_seconds)
        }
        .ok_or(nom::Err::Error(EmailError::BadTZOffset { is_east, hh, mm }))?;

        let date_time = date
            .and_hms_opt(u32::from(h), u32::from(m), u32::from(s.unwrap_or(0)))
            .and_then(|naive| tz.from_local_datetime(&naive).single())
            .ok_or(nom::Err::Error(EmailError::BadDateTime {
                date,
                tz,
                h,
                m,
                s,
            }))?;
        Ok((i, date_time))
    }
}

/// `[ day-of-week "," ] date time zone`, the literal zone offset is kept.
pub fn date_time(i: &[u8]) -> IResult<&[u8], DateTime<FixedOffset>, EmailError> {
    let (i, weekday) = opt(day_of_week)(i).map_err(nom::Err::convert)?;
    let (i, date) = date(i)?;
    let (i, time) = time(date)(i)?;
    if let Some(weekday) = weekday {
        use chrono::Datelike;
        if time.weekday() != weekday {
            // Plenty of relays get this wrong; the numeric date wins.
            log::trace!("{} is not a {:?}", time, weekday);
        }
    }
    Ok((i, time))
}

fn trailer(input: &[u8]) -> IResult<&[u8], (), EmailError> {
    let (i, _) =
        all_consuming(tuple((opt(fws), opt(comment), opt(fws))))(input).map_err(nom::Err::convert)?;
    Ok((i, ()))
}

/// Parse the clause after the last top-level `;` of a `Received` value.
///
/// The clause may end in a single comment (usually a zone name such as
/// `(GMT)`), anything else after the zone offset is rejected.
pub fn date_clause<'a>(input: &'a [u8]) -> Result<DateTime<FixedOffset>, EmailError<'a>> {
    let finish = |e: nom::Err<EmailError<'a>>| match e {
        nom::Err::Error(e) | nom::Err::Failure(e) => e,
        nom::Err::Incomplete(_) => {
            EmailError::Parse(Error::from_error_kind(input, ErrorKind::Complete))
        }
    };
    let (i, date_time) = date_time(input).map_err(finish)?;
    let (_, ()) = trailer(i).map_err(finish)?;
    Ok(date_time)
}
