use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::bytes::complete::take_while;
use nom::bytes::complete::take_while1;
use nom::combinator::opt;
use nom::combinator::value;
use nom::error::Error;
use nom::error::ErrorKind;
use nom::error::ParseError;
use nom::multi::many0_count;
use nom::sequence::tuple;
use nom::Err;
use nom::IResult;

pub mod date_time;
pub mod fallback;
pub mod received;

fn is_wsp(ch: u8) -> bool {
    ch == b' ' || ch == b'\t'
}

// Trace fields handed over by MTAs are frequently folded with a bare LF.
fn line_break(input: &[u8]) -> IResult<&[u8], &[u8]> {
    alt((tag(b"\r\n"), tag(b"\n")))(input)
}

/// Recognize folding white space - semantically treated as a space
pub fn fws(input: &[u8]) -> IResult<&[u8], ()> {
    let (i, _o) = tuple((
        opt(tuple((take_while(is_wsp), line_break))),
        take_while1(is_wsp),
    ))(input)?;

    Ok((i, ()))
}

pub(crate) fn satisfy_byte<F>(cond: F) -> impl Fn(&[u8]) -> IResult<&[u8], u8>
where
    F: Fn(u8) -> bool,
{
    move |input| {
        if input.is_empty() {
            Err(Err::Error(Error::from_error_kind(input, ErrorKind::Eof)))
        } else {
            let ch = input[0];
            if cond(ch) {
                Ok((&input[1..], input[0]))
            } else {
                Err(Err::Error(Error::from_error_kind(
                    input,
                    ErrorKind::Satisfy,
                )))
            }
        }
    }
}

pub(crate) fn is_vchar(ch: u8) -> bool {
    (0x21..=0x7e).contains(&ch)
}

// Raw UTF-8 is let through wherever text is allowed (RFC 6532).
pub(crate) fn is_utf8_non_ascii(ch: u8) -> bool {
    ch >= 0x80
}

fn is_quotable(ch: u8) -> bool {
    is_vchar(ch) || is_wsp(ch) || is_utf8_non_ascii(ch)
}

pub fn quoted_pair(input: &[u8]) -> IResult<&[u8], u8> {
    let (i, (_backslash, ch)) = tuple((tag(b"\\"), satisfy_byte(is_quotable)))(input)?;
    Ok((i, ch))
}

fn is_ctext(ch: u8) -> bool {
    (33..=39).contains(&ch)
        || (42..=91).contains(&ch)
        || (93..=126).contains(&ch)
        || is_utf8_non_ascii(ch)
}

fn ccontent(input: &[u8]) -> IResult<&[u8], ()> {
    alt((
        value((), satisfy_byte(is_ctext)),
        value((), quoted_pair),
        comment,
    ))(input)
}

pub fn comment(input: &[u8]) -> IResult<&[u8], ()> {
    value(
        (),
        tuple((
            tag(b"("),
            many0_count(tuple((opt(fws), ccontent))),
            opt(fws),
            tag(b")"),
        )),
    )(input)
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_fws() {
        let (i, ()) = super::fws(b"    \r\n   hi!").unwrap();
        assert_eq!(i, b"hi!");
    }

    #[test]
    fn test_fws_bare_lf() {
        let (i, ()) = super::fws(b"\n\thi!").unwrap();
        assert_eq!(i, b"hi!");
        assert!(super::fws(b"\nhi!").is_err());
    }

    #[test]
    fn test_comment() {
        let (i, ()) = super::comment(b"(localhost [127.0.0.1]) by").unwrap();
        assert_eq!(i, b" by");
        let (i, ()) = super::comment(b"(outer (inner) \\) tail)").unwrap();
        assert_eq!(i, b"");
        assert!(super::comment(b"(never closed").is_err());
    }

    #[test]
    fn test_quoted_pair() {
        assert_eq!(super::quoted_pair(b"\\\"rest"), Ok((&b"rest"[..], b'"')));
        assert!(super::quoted_pair(b"\\").is_err());
    }
}
