use std::borrow::Cow;

pub mod error;
pub mod headers;
pub mod parse;

/// Undo header folding: a line break (CRLF, or a bare LF or CR) followed by
/// white space is removed, any other line break becomes a single space. The
/// result never contains a line break.
pub fn unfold(text: &str) -> Cow<'_, str> {
    if !text.contains(|ch: char| ch == '\r' || ch == '\n') {
        return Cow::Borrowed(text);
    }
    let mut unfolded = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\r' | '\n' => {
                if ch == '\r' {
                    chars.next_if_eq(&'\n');
                }
                match chars.peek() {
                    Some(' ') | Some('\t') => {}
                    Some(_) => unfolded.push(' '),
                    None => {}
                }
            }
            _ => unfolded.push(ch),
        }
    }
    Cow::Owned(unfolded)
}

#[test]
fn test_unfold() {
    assert_eq!(unfold("no folding"), "no folding");
    assert_eq!(
        unfold("from a\r\n\tby b;\r\n 1 Jan 2020"),
        "from a\tby b; 1 Jan 2020"
    );
    assert_eq!(unfold("a\r\nb"), "a b");
    assert_eq!(unfold("bare\nnewline"), "bare newline");
    assert_eq!(unfold("bare\n\tfold\rcr"), "bare\tfold cr");
    assert_eq!(unfold("trailing\r\n"), "trailing");
}
