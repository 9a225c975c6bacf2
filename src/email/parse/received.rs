//! Tokenizer for the value of a `Received` trace field.
//!
//! RFC 5322 gives `received-token` as `word / angle-addr / addr-spec /
//! domain`, but what relays actually write is looser than that. The value is
//! accepted when it breaks down into atoms, quoted strings, domain literals,
//! comments and `;` separators; otherwise nothing in it is trusted and the
//! caller has to fall back to scanning for a date.

use enum_kinds::EnumKind;
use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::bytes::complete::take_while;
use nom::bytes::complete::take_while1;
use nom::bytes::complete::take_while_m_n;
use nom::combinator::all_consuming;
use nom::combinator::consumed;
use nom::combinator::map;
use nom::combinator::opt;
use nom::combinator::recognize;
use nom::combinator::value;
use nom::combinator::verify;
use nom::multi::fold_many0;
use nom::multi::many0_count;
use nom::sequence::delimited;
use nom::sequence::tuple;
use nom::IResult;

use super::super::error::EmailError;
use super::comment;
use super::fws;
use super::is_utf8_non_ascii;
use super::is_vchar;
use super::quoted_pair;
use super::satisfy_byte;

#[derive(Clone, Debug, PartialEq, Eq, EnumKind)]
#[enum_kind(SplitKind)]
pub enum SplitOutcome {
    /// Every token classified; `info` precedes the last top-level `;` and
    /// `date_clause` follows it (empty when there is no `;`).
    Structured { info: String, date_clause: String },
    /// Some part of the value is not a recognizable token.
    Unstructured { raw: String },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Token {
    Space,
    Separator,
    Comment,
    Quoted,
    DomainLiteral,
    Atom,
}

fn is_space(ch: u8) -> bool {
    ch == b' ' || ch == b'\t' || ch == b'\r' || ch == b'\n'
}

fn is_atom_byte(ch: u8) -> bool {
    is_utf8_non_ascii(ch) || (is_vchar(ch) && !b"()[]\";\\".contains(&ch))
}

fn digits(min: usize, max: usize) -> impl Fn(&[u8]) -> IResult<&[u8], &[u8]> {
    move |input| take_while_m_n(min, max, |ch: u8| ch.is_ascii_digit())(input)
}

fn time_of_day(input: &[u8]) -> IResult<&[u8], ()> {
    value(
        (),
        tuple((
            digits(1, 2),
            tag(b":"),
            digits(2, 2),
            opt(tuple((tag(b":"), digits(2, 2)))),
        )),
    )(input)
}

// An apostrophe opens a quoted string at the start of a token and is plain
// text anywhere else (`o'brien@example.com`).
//
// A colon only shows up in a bare atom as part of a time of day; anything
// else (IPv6 addresses, stray field names) means the value is not what it
// claims to be.
fn atom(input: &[u8]) -> IResult<&[u8], &[u8]> {
    let first = satisfy_byte(|ch| ch != b'\'' && is_atom_byte(ch));
    verify(recognize(tuple((first, take_while(is_atom_byte)))), |atom: &[u8]| {
        !atom.contains(&b':') || all_consuming(time_of_day)(atom).is_ok()
    })(input)
}

fn quoted(delim: u8) -> impl Fn(&[u8]) -> IResult<&[u8], ()> {
    move |input| {
        let qtext = satisfy_byte(move |ch| {
            (is_vchar(ch) || is_utf8_non_ascii(ch)) && ch != delim && ch != b'\\'
        });
        value(
            (),
            tuple((
                satisfy_byte(move |ch| ch == delim),
                many0_count(tuple((opt(fws), alt((qtext, quoted_pair))))),
                opt(fws),
                satisfy_byte(move |ch| ch == delim),
            )),
        )(input)
    }
}

fn is_dtext(ch: u8) -> bool {
    (33..=90).contains(&ch) || (94..=126).contains(&ch)
}

fn domain_literal(input: &[u8]) -> IResult<&[u8], ()> {
    value(
        (),
        delimited(
            tag(b"["),
            many0_count(delimited(opt(fws), satisfy_byte(is_dtext), opt(fws))),
            tag(b"]"),
        ),
    )(input)
}

fn token(input: &[u8]) -> IResult<&[u8], Token> {
    alt((
        value(Token::Space, take_while1(is_space)),
        value(Token::Separator, tag(b";")),
        value(Token::Comment, comment),
        value(Token::Quoted, alt((quoted(b'"'), quoted(b'\'')))),
        value(Token::DomainLiteral, domain_literal),
        value(Token::Atom, atom),
    ))(input)
}

/// Byte offset of the last top-level `;`, if the whole input tokenizes.
fn last_separator(input: &[u8]) -> IResult<&[u8], Option<usize>> {
    map(
        all_consuming(fold_many0(
            consumed(token),
            (0, None),
            |(offset, last), (span, token): (&[u8], Token)| {
                let last = if token == Token::Separator {
                    Some(offset)
                } else {
                    last
                };
                (offset + span.len(), last)
            },
        )),
        |(_, last)| last,
    )(input)
}

/// Split a raw `Received` value into routing info and date clause.
pub fn split_value(raw: &str) -> SplitOutcome {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return SplitOutcome::Structured {
            info: String::new(),
            date_clause: String::new(),
        };
    }
    match last_separator(trimmed.as_bytes()) {
        Ok((_, Some(pos))) => SplitOutcome::Structured {
            info: trimmed[..pos].trim_end().to_owned(),
            date_clause: trimmed[pos + 1..].trim_start().to_owned(),
        },
        Ok((_, None)) => SplitOutcome::Structured {
            info: trimmed.to_owned(),
            date_clause: String::new(),
        },
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            log::debug!("unstructured Received value: {}", EmailError::Unclassifiable(e));
            SplitOutcome::Unstructured {
                raw: raw.to_owned(),
            }
        }
        Err(nom::Err::Incomplete(_)) => SplitOutcome::Unstructured {
            raw: raw.to_owned(),
        },
    }
}

/// Drop one trailing comment, when it is the last token of the value.
pub fn strip_trailing_comment(raw: &str) -> &str {
    let trimmed = raw.trim();
    let bytes = trimmed.as_bytes();
    if bytes.last() != Some(&b')') || is_escaped(bytes, bytes.len() - 1) {
        return trimmed;
    }
    let mut depth = 0usize;
    for idx in (0..bytes.len()).rev() {
        if is_escaped(bytes, idx) {
            continue;
        }
        match bytes[idx] {
            b')' => depth += 1,
            b'(' => {
                depth -= 1;
                if depth == 0 {
                    return if all_consuming(comment)(&bytes[idx..]).is_ok() {
                        trimmed[..idx].trim_end()
                    } else {
                        trimmed
                    };
                }
            }
            _ => {}
        }
    }
    trimmed
}

fn is_escaped(bytes: &[u8], idx: usize) -> bool {
    bytes[..idx].iter().rev().take_while(|&&ch| ch == b'\\').count() % 2 == 1
}
